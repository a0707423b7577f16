//! Shopping cart suite

mod common;

use std::sync::Arc;

use common::{meta, MockShop, ScratchReport, PRODUCT_ADDED};
use demoshop_common::Severity;
use demoshop_e2e::data::{Product, TestUser, LAPTOP, SIMPLE_COMPUTER};
use demoshop_e2e::{AttachmentType, DemoWebShopApi, E2eResult, TestReport};

const FEATURE: &str = "Корзина";
const STORY: &str = "Работа с корзиной";

async fn login(api: &DemoWebShopApi, report: &TestReport, user: &TestUser) -> E2eResult<()> {
    let _step = report.step("Авторизуемся в системе");
    api.login(&user.email, &user.password).await?;
    Ok(())
}

async fn add_to_cart(api: DemoWebShopApi, report: Arc<TestReport>, user: &TestUser) -> E2eResult<()> {
    let api = api.with_report(Arc::clone(&report));
    login(&api, &report, user).await?;

    let response = {
        let _step = report.step("Добавляем товар в корзину");
        let response = api.add_to_cart(SIMPLE_COMPUTER.id, 1).await?;
        report.attach("response.html", AttachmentType::Html, &response.text)?;
        response
    };

    let _step = report.step("Проверяем успешность добавления");
    assert_eq!(response.status_code(), 200);
    assert!(response.contains(PRODUCT_ADDED));
    report.pass();
    Ok(())
}

async fn view_cart(api: DemoWebShopApi, report: Arc<TestReport>, user: &TestUser) -> E2eResult<()> {
    let api = api.with_report(Arc::clone(&report));
    login(&api, &report, user).await?;

    let response = {
        let _step = report.step("Получаем содержимое корзины");
        let response = api.cart().await?;
        report.attach("cart_content.html", AttachmentType::Html, &response.text)?;
        response
    };

    let _step = report.step("Проверяем успешность получения корзины");
    assert_eq!(response.status_code(), 200);
    assert!(response.contains("Shopping cart"));
    report.pass();
    Ok(())
}

async fn add_multiple_products(
    api: DemoWebShopApi,
    report: Arc<TestReport>,
    user: &TestUser,
) -> E2eResult<()> {
    let api = api.with_report(Arc::clone(&report));
    login(&api, &report, user).await?;

    let products: [(Product, u32); 2] = [(SIMPLE_COMPUTER, 1), (LAPTOP, 2)];

    for (product, quantity) in products {
        let _step = report.step(format!(
            "Добавляем товар {} в количестве {}",
            product.name, quantity
        ));
        let response = api.add_to_cart(product.id, quantity).await?;
        report.attach(
            format!("add_{}_response.html", product.name),
            AttachmentType::Html,
            &response.text,
        )?;

        assert_eq!(response.status_code(), 200);
        assert!(response.contains(PRODUCT_ADDED));
    }

    let _step = report.step("Проверяем содержимое корзины");
    let cart = api.cart().await?;
    assert_eq!(cart.status_code(), 200);
    for (product, _) in products {
        assert!(cart.contains(product.name), "{} is not in the cart", product.name);
    }
    report.pass();
    Ok(())
}

#[tokio::test]
async fn test_add_to_cart() {
    let shop = MockShop::start().await;
    let user = TestUser::default();
    shop.mount_login(&user).await;
    shop.mount_cart().await;

    let scratch = ScratchReport::new();
    let report = scratch.start(meta(FEATURE, STORY, "Добавление товара в корзину", Severity::Critical));

    add_to_cart(shop.api(), report, &user).await.unwrap();

    let requests = shop.server.received_requests().await.unwrap();
    let add = requests
        .iter()
        .find(|r| r.url.path() == "/addproducttocart/catalog/75/1")
        .expect("add-to-cart request was sent");
    assert_eq!(String::from_utf8_lossy(&add.body), "quantity=1");
    assert_eq!(scratch.results()[0]["status"], "passed");
}

#[tokio::test]
async fn test_view_cart() {
    let shop = MockShop::start().await;
    let user = TestUser::default();
    shop.mount_login(&user).await;
    shop.mount_cart().await;

    let scratch = ScratchReport::new();
    let report = scratch.start(meta(FEATURE, STORY, "Просмотр содержимого корзины", Severity::Critical));

    view_cart(shop.api(), report, &user).await.unwrap();
}

#[tokio::test]
async fn test_add_multiple_products() {
    let shop = MockShop::start().await;
    let user = TestUser::default();
    shop.mount_login(&user).await;
    shop.mount_cart().await;

    let scratch = ScratchReport::new();
    let report = scratch.start(meta(
        FEATURE,
        STORY,
        "Добавление нескольких товаров в корзину",
        Severity::Normal,
    ));

    add_multiple_products(shop.api(), report, &user).await.unwrap();

    let requests = shop.server.received_requests().await.unwrap();
    let laptop = requests
        .iter()
        .find(|r| r.url.path() == "/addproducttocart/catalog/31/1")
        .expect("laptop was added");
    assert_eq!(String::from_utf8_lossy(&laptop.body), "quantity=2");
}

#[tokio::test]
async fn test_cart_requires_login_in_same_session() {
    let shop = MockShop::start().await;
    let user = TestUser::default();
    shop.mount_login(&user).await;
    shop.mount_cart().await;

    let logged_in = shop.api();
    logged_in.login(&user.email, &user.password).await.unwrap();

    // A second helper has its own cookie jar.
    let anonymous = shop.api();
    let response = anonymous.add_to_cart(SIMPLE_COMPUTER.id, 1).await.unwrap();
    assert_eq!(response.status_code(), 404);
    assert!(!response.contains(PRODUCT_ADDED));

    let response = logged_in.add_to_cart(SIMPLE_COMPUTER.id, 1).await.unwrap();
    assert!(response.contains(PRODUCT_ADDED));
}

#[tokio::test]
#[ignore]
async fn live_add_to_cart() {
    let config = common::live_config();
    let report = common::live_report(&config).start_test(meta(
        FEATURE,
        STORY,
        "Добавление товара в корзину",
        Severity::Critical,
    ));
    let api = DemoWebShopApi::with_base_url(&config.site.base_url).unwrap();
    add_to_cart(api, report, &config.user).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn live_view_cart() {
    let config = common::live_config();
    let report = common::live_report(&config).start_test(meta(
        FEATURE,
        STORY,
        "Просмотр содержимого корзины",
        Severity::Critical,
    ));
    let api = DemoWebShopApi::with_base_url(&config.site.base_url).unwrap();
    view_cart(api, report, &config.user).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn live_add_multiple_products() {
    let config = common::live_config();
    let report = common::live_report(&config).start_test(meta(
        FEATURE,
        STORY,
        "Добавление нескольких товаров в корзину",
        Severity::Normal,
    ));
    let api = DemoWebShopApi::with_base_url(&config.site.base_url).unwrap();
    add_multiple_products(api, report, &config.user).await.unwrap();
}
