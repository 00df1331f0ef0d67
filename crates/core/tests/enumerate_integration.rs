//! Integration tests for full-collection scans over the adapter contract.

mod support;

use std::collections::HashSet;

use mailbridge_core::{collect_all_campaigns, collect_all_lists, PlatformAdapter};
use mailbridge_domain::{
    CampaignStatus, CreateCampaignInput, PaginationOptions, Platform, PlatformError,
    UpdateCampaignInput,
};
use support::adapter::InMemoryAdapter;

#[tokio::test]
async fn full_scan_has_no_duplicates_or_gaps() {
    let adapter = InMemoryAdapter::new(Platform::Brevo).with_campaigns(23);

    let campaigns = collect_all_campaigns(&adapter, 5).await.unwrap();

    assert_eq!(campaigns.len(), 23);
    let unique: HashSet<_> = campaigns.iter().map(|c| c.id.clone()).collect();
    assert_eq!(unique.len(), 23);
    assert_eq!(campaigns.first().unwrap().id, "c-000");
    assert_eq!(campaigns.last().unwrap().id, "c-022");
}

#[tokio::test]
async fn manual_paging_ends_with_no_cursor() {
    let adapter = InMemoryAdapter::new(Platform::Mailchimp).with_lists(7);

    let mut options = PaginationOptions::first_page(3);
    let mut pages = 0;
    loop {
        let page = adapter.list_lists(&options).await.unwrap();
        pages += 1;
        if !page.has_more {
            assert!(page.next_cursor.is_none());
            assert_eq!(page.items.len(), 1);
            break;
        }
        options.cursor = page.next_cursor;
    }

    assert_eq!(pages, 3);
}

#[tokio::test]
async fn collects_lists_through_trait_object() {
    let adapter: Box<dyn PlatformAdapter> =
        Box::new(InMemoryAdapter::new(Platform::SendGrid).with_lists(4));

    let lists = collect_all_lists(adapter.as_ref(), 100).await.unwrap();
    assert_eq!(lists.len(), 4);
}

#[tokio::test]
async fn empty_collection_is_a_single_final_page() {
    let adapter = InMemoryAdapter::new(Platform::SendGrid);
    let page = adapter.list_campaigns(&PaginationOptions::default()).await.unwrap();
    assert!(page.items.is_empty());
    assert!(!page.has_more);

    assert!(collect_all_campaigns(&adapter, 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn draft_campaign_metrics_are_unavailable() {
    let adapter = InMemoryAdapter::new(Platform::Mailchimp);
    let created = adapter
        .create_campaign(&CreateCampaignInput::new("Launch", "We are live").with_list("l-1"))
        .await
        .unwrap();
    assert_eq!(created.status, CampaignStatus::Draft);

    match adapter.get_metrics(&created.id).await {
        Err(PlatformError::MetricsUnavailable { status, .. }) => {
            assert_eq!(status, CampaignStatus::Draft)
        }
        other => panic!("expected metrics unavailable, got {:?}", other),
    }
}

#[tokio::test]
async fn sent_campaign_cannot_be_updated() {
    let adapter = InMemoryAdapter::new(Platform::Brevo).with_campaigns(1);
    let update = UpdateCampaignInput { name: Some("Renamed".into()), ..Default::default() };

    assert!(matches!(
        adapter.update_campaign("c-000", &update).await,
        Err(PlatformError::UnsupportedOperation { .. })
    ));
}
