//! Checks against a real Chrome started with `--remote-debugging-port`.
//!
//! Ignored by default; run with
//! `STOREFRONT_CDP_ENDPOINT=http://127.0.0.1:9222 cargo test --test live_browser_test -- --ignored`

use std::sync::Arc;
use std::time::Duration;
use storefront_pom::cdp::CdpDriver;
use storefront_pom::{with_session, Interactor, Locator, RetryPolicy, Timeouts};

const PAGE: &str = r#"<html><body style="height:3000px">
<h2 id="title">Searched Products</h2>
<input id="search_product" />
<p class="name">Blue Top</p>
<p class="name">Winter Top</p>
<p class="name" style="display:none">Hidden Top</p>
<button id="alert" onclick="alert('Press OK to proceed!')">Alert</button>
<select id="days"><option value="1">1</option><option value="10">10</option></select>
</body></html>"#;

fn endpoint() -> String {
    std::env::var("STOREFRONT_CDP_ENDPOINT").unwrap_or_else(|_| "http://127.0.0.1:9222".to_string())
}

fn data_url(html: &str) -> String {
    format!("data:text/html,{}", urlencoding::encode(html))
}

#[tokio::test]
#[ignore = "needs a running Chrome"]
async fn test_primitives_against_chrome() {
    let driver = CdpDriver::connect(&endpoint()).await.unwrap();

    with_session(Arc::new(driver), |session| async move {
        let ui = Interactor::new(
            session,
            Timeouts::new(Duration::from_secs(5), Duration::from_millis(100)),
            RetryPolicy::default(),
        );
        ui.navigate_to(&data_url(PAGE)).await?;

        assert_eq!(ui.read_text(&Locator::id("title")).await?, "Searched Products");
        assert_eq!(
            ui.read_texts(&Locator::css("p.name")).await?,
            vec!["Blue Top", "Winter Top"]
        );

        ui.type_text(&Locator::id("search_product"), "top").await?;
        assert_eq!(
            ui.read_attribute(&Locator::id("search_product"), "value").await?,
            Some("top".to_string())
        );

        ui.select_by_value(&Locator::id("days"), "10").await?;
        assert_eq!(
            ui.read_attribute(&Locator::id("days"), "value").await?,
            Some("10".to_string())
        );

        ui.scroll_to_bottom().await?;
        assert!(ui.scroll_offset().await? > 0);
        ui.scroll_to_top().await?;
        assert_eq!(ui.scroll_offset().await?, 0);

        ui.click(&Locator::id("alert")).await?;
        assert_eq!(ui.accept_alert().await?, "Press OK to proceed!");

        assert!(!ui.within(Duration::from_millis(500)).is_visible(&Locator::id("missing")).await);
        assert!(!ui.take_screenshot().await.is_empty());
        Ok(())
    })
    .await
    .unwrap();
}
