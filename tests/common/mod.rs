//! Common test utilities
//!
//! [`Storefront`] renders a small fake shop into a [`MockDriver`]: navigation
//! and click hooks rebuild the document from [`ShopState`] using the same
//! locators the page objects query, so whole flows run without a browser.

#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use storefront_pom::components::{CartModal, Header, ProductGrid};
use storefront_pom::driver::{MockDom, MockDriver, MockNode};
use storefront_pom::pages::{
    AccountCreatedPage, AccountDeletedPage, CartPage, CheckoutPage, HomePage, LoginPage,
    OrderPlacedPage, PaymentPage, ProductDetailsPage, ProductsPage, SignUpPage,
};
use storefront_pom::{Interactor, Navigator, RetryPolicy, Session, SessionHandle, Timeouts};

pub const BASE_URL: &str = "https://shop.test";

/// Name and unit price of every product on sale
pub const CATALOG: [(&str, u32); 5] = [
    ("Blue Top", 500),
    ("Men Tshirt", 400),
    ("Sleeveless Dress", 1000),
    ("Winter Top", 600),
    ("Stylish Dress", 1500),
];

/// Short waits keep failing lookups cheap; tests run on a paused clock anyway
pub fn test_timeouts() -> Timeouts {
    Timeouts::new(Duration::from_secs(2), Duration::from_millis(100))
}

pub fn test_retry() -> RetryPolicy {
    RetryPolicy::new(2, Duration::from_millis(200))
}

/// Navigator over `session` pointed at the fake shop
pub fn navigator(session: SessionHandle) -> Navigator {
    let ui = Interactor::new(session, test_timeouts(), test_retry());
    Navigator::new(ui, BASE_URL)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub name: String,
    pub price: u32,
    pub quantity: u32,
}

#[derive(Debug, Clone)]
pub struct Account {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default)]
pub struct ShopState {
    pub cart: Vec<CartLine>,
    pub accounts: Vec<Account>,
    pub logged_in: Option<String>,
    /// Name and email submitted on the signup form
    pending_signup: Option<(String, String)>,
    pub orders: u32,
}

impl ShopState {
    fn add_to_cart(&mut self, name: &str, quantity: u32) {
        let price = price_of(name);
        match self.cart.iter_mut().find(|line| line.name == name) {
            Some(line) => line.quantity += quantity,
            None => self.cart.push(CartLine {
                name: name.to_string(),
                price,
                quantity,
            }),
        }
    }
}

type Shop = Arc<Mutex<ShopState>>;

fn lock(shop: &Shop) -> MutexGuard<'_, ShopState> {
    shop.lock().unwrap_or_else(PoisonError::into_inner)
}

fn price_of(name: &str) -> u32 {
    CATALOG
        .iter()
        .find(|(product, _)| *product == name)
        .map_or(0, |(_, price)| *price)
}

/// Fake storefront bound to one mock driver
#[derive(Debug, Clone)]
pub struct Storefront {
    pub driver: MockDriver,
    pub shop: Shop,
}

impl Storefront {
    pub fn new() -> Self {
        let driver = MockDriver::new();
        let shop: Shop = Arc::default();

        let hook_shop = Arc::clone(&shop);
        driver.on_navigate(move |dom, url| {
            let path = path_of(url).to_string();
            render(dom, &hook_shop, &path);
        });

        Self { driver, shop }
    }

    pub fn session(&self) -> Session {
        Session::start(Arc::new(self.driver.clone()))
    }

    pub fn register_account(&self, name: &str, email: &str, password: &str) {
        lock(&self.shop).accounts.push(Account {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        });
    }

    pub fn log_in(&self, name: &str) {
        lock(&self.shop).logged_in = Some(name.to_string());
    }

    pub fn fill_cart(&self, items: &[(&str, u32)]) {
        let mut shop = lock(&self.shop);
        for (name, quantity) in items {
            shop.add_to_cart(name, *quantity);
        }
    }

    pub fn cart(&self) -> Vec<CartLine> {
        lock(&self.shop).cart.clone()
    }

    pub fn accounts(&self) -> Vec<Account> {
        lock(&self.shop).accounts.clone()
    }

    pub fn logged_in(&self) -> Option<String> {
        lock(&self.shop).logged_in.clone()
    }

    pub fn orders(&self) -> u32 {
        lock(&self.shop).orders
    }
}

fn path_of(url: &str) -> &str {
    let path = url.strip_prefix(BASE_URL).unwrap_or(url);
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        "/"
    } else {
        path
    }
}

/// Full page load of `path`
fn go(dom: &mut MockDom, shop: &Shop, path: &str) {
    dom.set_url(format!("{}{}", BASE_URL, path));
    render(dom, shop, path);
}

fn render(dom: &mut MockDom, shop: &Shop, path: &str) {
    dom.clear();
    render_header(dom, shop);
    match path {
        "/" => render_home(dom, shop),
        "/products" => render_products(dom, shop, None),
        "/view_cart" => render_cart(dom, shop),
        "/login" => render_login(dom, shop),
        "/signup" => render_signup(dom, shop),
        "/account_created" => render_account_created(dom, shop),
        "/delete_account" => render_account_deleted(dom, shop),
        "/checkout" => render_checkout(dom, shop),
        "/payment" => render_payment(dom, shop),
        "/payment_done" => render_order_placed(dom, shop),
        other => {
            if let Some(index) = other
                .strip_prefix("/product_details/")
                .and_then(|id| id.parse::<usize>().ok())
            {
                render_product_details(dom, shop, index);
            }
        }
    }
}

fn link(dom: &mut MockDom, shop: &Shop, locator: storefront_pom::Locator, path: &'static str) {
    let shop = Arc::clone(shop);
    dom.insert(MockNode::new(locator).on_click(move |dom| go(dom, &shop, path)));
}

fn render_header(dom: &mut MockDom, shop: &Shop) {
    dom.insert(MockNode::new(Header::CONTAINER));
    link(dom, shop, Header::HOME, "/");
    link(dom, shop, Header::PRODUCTS, "/products");
    link(dom, shop, Header::CART, "/view_cart");

    let logged_in = lock(shop).logged_in.clone();
    match logged_in {
        Some(name) => {
            dom.insert(MockNode::new(Header::LOGGED_USER).text(format!("Logged in as {}", name)));

            let logout_shop = Arc::clone(shop);
            dom.insert(MockNode::new(Header::LOGOUT).on_click(move |dom| {
                lock(&logout_shop).logged_in = None;
                go(dom, &logout_shop, "/login");
            }));

            let delete_shop = Arc::clone(shop);
            dom.insert(MockNode::new(Header::DELETE_ACCOUNT).on_click(move |dom| {
                {
                    let mut state = lock(&delete_shop);
                    if let Some(name) = state.logged_in.take() {
                        state.accounts.retain(|account| account.name != name);
                    }
                }
                go(dom, &delete_shop, "/delete_account");
            }));
        }
        None => link(dom, shop, Header::SIGNUP_LOGIN, "/login"),
    }
}

fn render_product_cards(dom: &mut MockDom, shop: &Shop, names: &[&'static str]) {
    for name in names {
        let name = *name;
        dom.insert(MockNode::new(ProductsPage::PRODUCT_ITEMS));
        dom.insert(MockNode::new(ProductsPage::PRODUCT_NAMES).text(name));
        dom.insert(MockNode::new(ProductGrid::card(name)));

        let index = CATALOG
            .iter()
            .position(|(product, _)| *product == name)
            .unwrap_or_default()
            + 1;
        let view_shop = Arc::clone(shop);
        dom.insert(
            MockNode::new(ProductGrid::view_product_link(name))
                .on_click(move |dom| go(dom, &view_shop, &format!("/product_details/{}", index))),
        );

        let add_shop = Arc::clone(shop);
        dom.insert(
            MockNode::new(ProductGrid::overlay_add_button(name)).on_click(move |dom| {
                lock(&add_shop).add_to_cart(name, 1);
                show_cart_modal(dom, &add_shop);
            }),
        );
    }
}

fn show_cart_modal(dom: &mut MockDom, shop: &Shop) {
    dom.insert(MockNode::new(CartModal::CONTAINER));
    dom.insert(MockNode::new(CartModal::CONTINUE_SHOPPING).on_click(|dom| {
        dom.remove(&CartModal::CONTAINER);
        dom.remove(&CartModal::CONTINUE_SHOPPING);
        dom.remove(&CartModal::VIEW_CART);
    }));
    link(dom, shop, CartModal::VIEW_CART, "/view_cart");
}

fn render_home(dom: &mut MockDom, shop: &Shop) {
    dom.insert(MockNode::new(HomePage::SLIDER));
    dom.insert(MockNode::new(HomePage::FEATURES));
    let names: Vec<&'static str> = CATALOG.iter().map(|(name, _)| *name).collect();
    render_product_cards(dom, shop, &names);
}

fn render_products(dom: &mut MockDom, shop: &Shop, search: Option<&str>) {
    let names: Vec<&'static str> = match search {
        Some(term) => {
            dom.insert(MockNode::new(ProductsPage::SEARCHED_TITLE).text("Searched Products"));
            let term = term.to_lowercase();
            CATALOG
                .iter()
                .map(|(name, _)| *name)
                .filter(|name| name.to_lowercase().contains(&term))
                .collect()
        }
        None => {
            dom.insert(MockNode::new(ProductsPage::ALL_PRODUCTS_TITLE).text("All Products"));
            CATALOG.iter().map(|(name, _)| *name).collect()
        }
    };

    dom.insert(MockNode::new(ProductsPage::SEARCH_INPUT));
    let search_shop = Arc::clone(shop);
    dom.insert(MockNode::new(ProductsPage::SEARCH_BUTTON).on_click(move |dom| {
        let term = dom.value_of(&ProductsPage::SEARCH_INPUT).unwrap_or_default();
        dom.set_url(format!("{}/products?search={}", BASE_URL, term));
        dom.clear();
        render_header(dom, &search_shop);
        render_products(dom, &search_shop, Some(&term));
    }));

    render_product_cards(dom, shop, &names);
}

fn render_product_details(dom: &mut MockDom, shop: &Shop, index: usize) {
    let Some((name, price)) = index.checked_sub(1).and_then(|i| CATALOG.get(i)).copied() else {
        return;
    };

    dom.insert(MockNode::new(ProductDetailsPage::INFORMATION));
    dom.insert(MockNode::new(ProductDetailsPage::NAME).text(name));
    dom.insert(MockNode::new(ProductDetailsPage::CATEGORY).text("Category: Women > Tops"));
    dom.insert(MockNode::new(ProductDetailsPage::PRICE).text(format!("Rs. {}", price)));
    dom.insert(MockNode::new(ProductDetailsPage::AVAILABILITY).text("Availability: In Stock"));
    dom.insert(MockNode::new(ProductDetailsPage::CONDITION).text("Condition: New"));
    dom.insert(MockNode::new(ProductDetailsPage::BRAND).text("Brand: Polo"));
    dom.insert(MockNode::new(ProductDetailsPage::QUANTITY).value("1"));

    let add_shop = Arc::clone(shop);
    dom.insert(MockNode::new(ProductDetailsPage::ADD_TO_CART).on_click(move |dom| {
        let quantity = dom
            .value_of(&ProductDetailsPage::QUANTITY)
            .and_then(|q| q.trim().parse::<u32>().ok())
            .unwrap_or(1);
        lock(&add_shop).add_to_cart(name, quantity);
        show_cart_modal(dom, &add_shop);
    }));
}

fn render_cart(dom: &mut MockDom, shop: &Shop) {
    dom.insert(MockNode::new(CartPage::BREADCRUMB).text("Shopping Cart"));
    dom.insert(MockNode::new(CartPage::TABLE));

    let (cart, logged_in) = {
        let state = lock(shop);
        (state.cart.clone(), state.logged_in.is_some())
    };
    for line in &cart {
        dom.insert(MockNode::new(CartPage::ROWS));
        dom.insert(MockNode::new(CartPage::row(&line.name)));
        dom.insert(MockNode::new(CartPage::ITEM_NAMES).text(line.name.clone()));
        dom.insert(MockNode::new(CartPage::quantity_cell(&line.name)).text(line.quantity.to_string()));
        dom.insert(MockNode::new(CartPage::price_cell(&line.name)).text(format!("Rs. {}", line.price)));
        dom.insert(
            MockNode::new(CartPage::total_cell(&line.name))
                .text(format!("Rs. {}", line.price * line.quantity)),
        );

        let delete_shop = Arc::clone(shop);
        let name = line.name.clone();
        dom.insert(MockNode::new(CartPage::delete_button(&line.name)).on_click(move |dom| {
            lock(&delete_shop).cart.retain(|l| l.name != name);
            render(dom, &delete_shop, "/view_cart");
        }));
    }

    if logged_in {
        link(dom, shop, CartPage::PROCEED_TO_CHECKOUT, "/checkout");
    } else {
        let modal_shop = Arc::clone(shop);
        dom.insert(MockNode::new(CartPage::PROCEED_TO_CHECKOUT).on_click(move |dom| {
            dom.insert(MockNode::new(CartPage::CHECKOUT_MODAL));
            link(dom, &modal_shop, CartPage::REGISTER_LOGIN, "/login");
        }));
    }
}

fn render_login(dom: &mut MockDom, shop: &Shop) {
    dom.insert(MockNode::new(LoginPage::SIGNUP_LABEL).text("New User Signup!"));
    dom.insert(MockNode::new(LoginPage::SIGNUP_NAME));
    dom.insert(MockNode::new(LoginPage::SIGNUP_EMAIL));

    let signup_shop = Arc::clone(shop);
    dom.insert(MockNode::new(LoginPage::SIGNUP_BUTTON).on_click(move |dom| {
        let name = dom.value_of(&LoginPage::SIGNUP_NAME).unwrap_or_default();
        let email = dom.value_of(&LoginPage::SIGNUP_EMAIL).unwrap_or_default();
        let taken = lock(&signup_shop).accounts.iter().any(|a| a.email == email);
        if taken {
            render(dom, &signup_shop, "/login");
            dom.insert(MockNode::new(LoginPage::EMAIL_EXISTS).text("Email Address already exist!"));
        } else {
            lock(&signup_shop).pending_signup = Some((name, email));
            go(dom, &signup_shop, "/signup");
        }
    }));

    dom.insert(MockNode::new(LoginPage::LOGIN_LABEL).text("Login to your account"));
    dom.insert(MockNode::new(LoginPage::LOGIN_EMAIL));
    dom.insert(MockNode::new(LoginPage::LOGIN_PASSWORD));

    let login_shop = Arc::clone(shop);
    dom.insert(MockNode::new(LoginPage::LOGIN_BUTTON).on_click(move |dom| {
        let email = dom.value_of(&LoginPage::LOGIN_EMAIL).unwrap_or_default();
        let password = dom.value_of(&LoginPage::LOGIN_PASSWORD).unwrap_or_default();
        let account = lock(&login_shop)
            .accounts
            .iter()
            .find(|a| a.email == email && a.password == password)
            .cloned();
        match account {
            Some(account) => {
                lock(&login_shop).logged_in = Some(account.name);
                go(dom, &login_shop, "/");
            }
            None => {
                dom.insert(
                    MockNode::new(LoginPage::LOGIN_ERROR)
                        .text("Your email or password is incorrect!"),
                );
            }
        }
    }));
}

fn render_signup(dom: &mut MockDom, shop: &Shop) {
    let (name, email) = lock(shop).pending_signup.clone().unwrap_or_default();

    dom.insert(
        MockNode::new(SignUpPage::ACCOUNT_INFO_LABEL).text("Enter Account Information"),
    );
    dom.insert(MockNode::new(SignUpPage::TITLE_MR).checkbox());
    dom.insert(MockNode::new(SignUpPage::TITLE_MRS).checkbox());
    dom.insert(MockNode::new(SignUpPage::NAME).value(name));
    dom.insert(MockNode::new(SignUpPage::EMAIL).value(email).disabled());
    for locator in [
        SignUpPage::PASSWORD,
        SignUpPage::BIRTH_DAY,
        SignUpPage::BIRTH_MONTH,
        SignUpPage::BIRTH_YEAR,
        SignUpPage::FIRST_NAME,
        SignUpPage::LAST_NAME,
        SignUpPage::COMPANY,
        SignUpPage::ADDRESS1,
        SignUpPage::ADDRESS2,
        SignUpPage::COUNTRY,
        SignUpPage::STATE,
        SignUpPage::CITY,
        SignUpPage::ZIPCODE,
        SignUpPage::MOBILE_NUMBER,
    ] {
        dom.insert(MockNode::new(locator));
    }
    dom.insert(MockNode::new(SignUpPage::NEWSLETTER).checkbox());
    dom.insert(MockNode::new(SignUpPage::OFFERS).checkbox());

    let create_shop = Arc::clone(shop);
    dom.insert(MockNode::new(SignUpPage::CREATE_ACCOUNT).on_click(move |dom| {
        let password = dom.value_of(&SignUpPage::PASSWORD).unwrap_or_default();
        {
            let mut state = lock(&create_shop);
            let (name, email) = state.pending_signup.take().unwrap_or_default();
            state.accounts.push(Account {
                name: name.clone(),
                email,
                password,
            });
            state.logged_in = Some(name);
        }
        go(dom, &create_shop, "/account_created");
    }));
}

fn render_account_created(dom: &mut MockDom, shop: &Shop) {
    dom.insert(MockNode::new(AccountCreatedPage::TITLE).text("Account Created!"));
    link(dom, shop, AccountCreatedPage::CONTINUE, "/");
}

fn render_account_deleted(dom: &mut MockDom, shop: &Shop) {
    dom.insert(MockNode::new(AccountDeletedPage::TITLE).text("Account Deleted!"));
    link(dom, shop, AccountDeletedPage::CONTINUE, "/");
}

fn render_checkout(dom: &mut MockDom, shop: &Shop) {
    dom.insert(MockNode::new(CheckoutPage::DELIVERY_LABEL).text("Your delivery address"));
    dom.insert(MockNode::new(CheckoutPage::BILLING_LABEL).text("Your billing address"));
    dom.insert(MockNode::new(CheckoutPage::ADDRESS_BLOCKS));
    dom.insert(MockNode::new(CheckoutPage::ADDRESS_BLOCKS));
    for line in ["Mr. Test User", "221B Baker Street", "Canada"] {
        dom.insert(MockNode::new(CheckoutPage::DELIVERY_LINES).text(line));
        dom.insert(MockNode::new(CheckoutPage::BILLING_LINES).text(line));
    }
    dom.insert(MockNode::new(CheckoutPage::REVIEW_ORDER).text("Review Your Order"));
    for _ in lock(shop).cart.iter() {
        dom.insert(MockNode::new(CheckoutPage::ORDER_ROWS));
    }
    dom.insert(MockNode::new(CheckoutPage::COMMENT));
    link(dom, shop, CheckoutPage::PLACE_ORDER, "/payment");
}

fn render_payment(dom: &mut MockDom, shop: &Shop) {
    for locator in [
        PaymentPage::NAME_ON_CARD,
        PaymentPage::CARD_NUMBER,
        PaymentPage::CVC,
        PaymentPage::EXPIRY_MONTH,
        PaymentPage::EXPIRY_YEAR,
    ] {
        dom.insert(MockNode::new(locator));
    }

    let pay_shop = Arc::clone(shop);
    dom.insert(MockNode::new(PaymentPage::PAY_AND_CONFIRM).on_click(move |dom| {
        {
            let mut state = lock(&pay_shop);
            state.cart.clear();
            state.orders += 1;
        }
        go(dom, &pay_shop, "/payment_done");
    }));
}

fn render_order_placed(dom: &mut MockDom, shop: &Shop) {
    dom.insert(MockNode::new(OrderPlacedPage::TITLE).text("Order Placed!"));
    dom.insert(
        MockNode::new(OrderPlacedPage::CONFIRMATION)
            .text("Congratulations! Your order has been confirmed!"),
    );
    dom.insert(MockNode::new(OrderPlacedPage::DOWNLOAD_INVOICE));
    link(dom, shop, OrderPlacedPage::CONTINUE, "/");
}
