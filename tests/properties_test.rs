//! Behavioural guarantees of the interaction layer and the navigator

mod common;

use common::{navigator, test_timeouts, Storefront};
use std::sync::Arc;
use std::time::Duration;
use storefront_pom::driver::{MockDriver, MockFault, MockNode};
use storefront_pom::pages::{CartPage, PageId, ProductsPage};
use storefront_pom::{
    ClickOutcome, Error, Interactor, Locator, Page, RetryPolicy, Session, Timeouts,
    TransientFault,
};
use tokio::time::Instant;
use tokio_test::{assert_err, assert_ok};

const BUTTON: Locator = Locator::css("button.cart");
const MISSING: Locator = Locator::id("does-not-exist");

fn interactor(driver: &MockDriver, retry: RetryPolicy) -> (Session, Interactor) {
    let session = Session::start(Arc::new(driver.clone()));
    let ui = Interactor::new(session.handle(), test_timeouts(), retry);
    (session, ui)
}

#[tokio::test(start_paused = true)]
async fn test_visibility_checks_are_idempotent() {
    let driver = MockDriver::new();
    driver.insert(MockNode::new(Locator::id("shown")));
    driver.insert(MockNode::new(Locator::id("hidden")).hidden());
    let (_session, ui) = interactor(&driver, RetryPolicy::default());

    for locator in [Locator::id("shown"), Locator::id("hidden"), MISSING] {
        let first = ui.is_visible(&locator).await;
        let second = ui.is_visible(&locator).await;
        assert_eq!(first, second, "{}", locator);
    }
    assert!(ui.is_visible(&Locator::id("shown")).await);
    assert!(!ui.is_visible(&Locator::id("hidden")).await);
}

#[tokio::test(start_paused = true)]
async fn test_find_visible_blocks_for_the_timeout() {
    let driver = MockDriver::new();
    let timeouts = Timeouts::new(Duration::from_secs(3), Duration::from_millis(250));
    let session = Session::start(Arc::new(driver.clone()));
    let ui = Interactor::new(session.handle(), timeouts, RetryPolicy::default());

    let started = Instant::now();
    let result = ui.find_visible(&MISSING).await;
    let elapsed = started.elapsed();

    assert!(matches!(result, Err(Error::NotFound { .. })));
    assert!(elapsed >= timeouts.timeout, "returned after {:?}", elapsed);
    assert!(
        elapsed <= timeouts.timeout + timeouts.poll_interval,
        "returned after {:?}",
        elapsed
    );
}

#[tokio::test(start_paused = true)]
async fn test_single_stale_fault_is_absorbed() {
    let driver = MockDriver::new();
    driver.insert(MockNode::new(BUTTON).fail_clicks([MockFault::Stale]));
    let (_session, ui) = interactor(&driver, RetryPolicy::new(2, Duration::from_millis(200)));

    let outcome = ui.safe_click(&BUTTON).await;
    assert!(matches!(outcome, ClickOutcome::Clicked { attempts: 2 }));
    assert_eq!(driver.click_attempts(&BUTTON), 2);
    assert_ok!(ui.click(&Locator::css("button.cart")).await);
}

#[tokio::test(start_paused = true)]
async fn test_retry_budget_is_exhausted_exactly() {
    for retries in [0, 1, 3] {
        let driver = MockDriver::new();
        driver.insert(MockNode::new(BUTTON).always_fail(MockFault::Intercepted));
        let (_session, ui) = interactor(&driver, RetryPolicy::new(retries, Duration::from_millis(100)));

        let outcome = ui.safe_click(&BUTTON).await;
        assert!(
            matches!(
                outcome,
                ClickOutcome::Exhausted {
                    last_fault: TransientFault::ClickIntercepted,
                    ..
                }
            ),
            "{:?}",
            outcome
        );
        assert_eq!(outcome.attempts(), retries + 1);
        assert_eq!(driver.click_attempts(&BUTTON), retries + 1);
    }
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_click_raises_not_clickable() {
    let driver = MockDriver::new();
    driver.insert(MockNode::new(BUTTON).always_fail(MockFault::Stale));
    let (_session, ui) = interactor(&driver, RetryPolicy::new(2, Duration::from_millis(100)));

    let error = assert_err!(ui.click(&BUTTON).await);
    assert!(matches!(error, Error::NotClickable { .. }), "{:?}", error);
    assert_eq!(driver.click_attempts(&BUTTON), 3);
}

#[tokio::test(start_paused = true)]
async fn test_header_leads_to_the_same_page_from_any_page() {
    let shop = Storefront::new();
    let session = shop.session();
    let nav = navigator(session.handle());

    let home = nav.open_site().await.unwrap();
    let from_home: CartPage = home.header().click_cart().await.unwrap();
    assert!(from_home.is_cart_page_visible().await);

    let products: ProductsPage = nav.go_to().await.unwrap();
    let from_products: CartPage = products.header().click_cart().await.unwrap();
    assert!(from_products.is_cart_page_visible().await);

    assert_eq!(from_home.landmark(), from_products.landmark());
    assert!(from_home
        .context()
        .navigator()
        .session()
        .same_session(from_products.context().navigator().session()));
}

#[tokio::test(start_paused = true)]
async fn test_navigator_hands_out_fresh_equivalent_pages() {
    let shop = Storefront::new();
    let session = shop.session();
    let nav = navigator(session.handle());

    let first = nav.cart_page();
    let second = nav.cart_page();
    assert!(!std::ptr::eq(&first, &second));
    assert_eq!(first.landmark(), second.landmark());
    assert!(first
        .context()
        .navigator()
        .session()
        .same_session(second.context().navigator().session()));

    let by_id = nav.page_by_id(PageId::Cart);
    assert_eq!(by_id.id(), PageId::Cart);
    let third = by_id.downcast::<CartPage>().unwrap();
    assert_eq!(third.landmark(), first.landmark());
}

#[tokio::test(start_paused = true)]
async fn test_current_page_follows_the_url() {
    let shop = Storefront::new();
    let session = shop.session();
    let nav = navigator(session.handle());

    nav.open_site().await.unwrap();
    let page = nav.current_page().await.unwrap().unwrap();
    assert_eq!(page.id(), PageId::Home);
    assert!(page.is_displayed().await);

    nav.home_page().header().click_products().await.unwrap();
    let page = nav.current_page().await.unwrap().unwrap();
    assert!(page.is::<ProductsPage>());
}
