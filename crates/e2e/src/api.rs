//! HTTP client for the Demo Web Shop
//!
//! One `DemoWebShopApi` owns one session: a `reqwest` client sharing a cookie
//! jar with the helper, so cookies set by `login` are sent by later calls.
//! Responses are returned as-is; checking status codes and bodies is up to
//! the caller.

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument};
use url::Url;

use crate::config::DEFAULT_BASE_URL;
use crate::error::E2eResult;
use crate::report::{AttachmentType, TestReport};

/// Cookie names the shop has used for the auth ticket, most specific first
pub const AUTH_COOKIE_NAMES: [&str; 3] = ["NOPCOMMERCE.AUTH", ".NOPCOMMERCE.AUTH", "Authentication"];

/// A fully read HTTP response
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    /// URL after redirects
    pub url: Url,
    pub headers: HeaderMap,
    pub text: String,
}

impl ApiResponse {
    async fn read(response: reqwest::Response) -> E2eResult<Self> {
        let status = response.status();
        let url = response.url().clone();
        let headers = response.headers().clone();
        let text = response.text().await?;
        Ok(Self {
            status,
            url,
            headers,
            text,
        })
    }

    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.text.contains(needle)
    }
}

/// Stateful session against the shop
pub struct DemoWebShopApi {
    base_url: Url,
    client: Client,
    jar: Arc<Jar>,
    report: Option<Arc<TestReport>>,
}

impl DemoWebShopApi {
    /// Session against the public demo shop
    pub fn new() -> E2eResult<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Session against a shop at `base_url`; a path prefix such as
    /// `http://host/shop` is kept for every request
    pub fn with_base_url(base_url: &str) -> E2eResult<Self> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .build()?;

        Ok(Self {
            base_url,
            client,
            jar,
            report: None,
        })
    }

    /// Record calls as steps of `report`
    pub fn with_report(mut self, report: Arc<TestReport>) -> Self {
        self.report = Some(report);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> E2eResult<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn attach(&self, name: &str, kind: AttachmentType, body: &str) -> E2eResult<()> {
        match &self.report {
            Some(report) => report.attach(name, kind, body),
            None => Ok(()),
        }
    }

    async fn get(&self, step: &str, path: &str) -> E2eResult<ApiResponse> {
        let url = self.url(path)?;
        let _step = self.report.as_ref().map(|r| r.step(step));
        debug!("GET {}", url);
        ApiResponse::read(self.client.get(url).send().await?).await
    }

    async fn post_form<T: Serialize + ?Sized>(
        &self,
        step: &str,
        path: &str,
        form: &T,
    ) -> E2eResult<ApiResponse> {
        let url = self.url(path)?;
        let _step = self.report.as_ref().map(|r| r.step(step));
        debug!("POST {}", url);
        ApiResponse::read(self.client.post(url).form(form).send().await?).await
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> E2eResult<ApiResponse> {
        let response = self
            .post_form(
                "Выполняем вход через API",
                "/login",
                &[
                    ("Email", email),
                    ("Password", password),
                    ("RememberMe", "true"),
                ],
            )
            .await?;
        self.attach("response.html", AttachmentType::Html, &response.text)?;
        Ok(response)
    }

    /// Register a customer; `gender` is `M` or `F`
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
        gender: &str,
    ) -> E2eResult<ApiResponse> {
        self.post_form(
            "Регистрация нового пользователя",
            "/register",
            &[
                ("Gender", gender),
                ("FirstName", first_name),
                ("LastName", last_name),
                ("Email", email),
                ("Password", password),
                ("ConfirmPassword", password),
            ],
        )
        .await
    }

    /// Value of the first auth cookie present in the session.
    ///
    /// The whole jar is attached as `cookies.txt` for debugging.
    pub fn auth_token(&self) -> E2eResult<Option<String>> {
        let cookies = self.cookies();
        let dump = cookies
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ");
        self.attach("cookies.txt", AttachmentType::Text, &dump)?;

        Ok(AUTH_COOKIE_NAMES.iter().find_map(|wanted| {
            cookies
                .iter()
                .find(|(name, value)| name.as_str() == *wanted && !value.is_empty())
                .map(|(_, value)| value.clone())
        }))
    }

    /// Cookies the session would send to the shop
    pub fn cookies(&self) -> Vec<(String, String)> {
        let Some(header) = self.jar.cookies(&self.base_url) else {
            return Vec::new();
        };
        let Ok(header) = header.to_str() else {
            return Vec::new();
        };
        header
            .split(';')
            .filter_map(|pair| {
                let (name, value) = pair.trim().split_once('=')?;
                Some((name.to_string(), value.to_string()))
            })
            .collect()
    }

    #[instrument(skip(self))]
    pub async fn add_to_cart(&self, product_id: u32, quantity: u32) -> E2eResult<ApiResponse> {
        let quantity = quantity.to_string();
        self.post_form(
            "Добавление товара в корзину",
            &format!("/addproducttocart/catalog/{}/1", product_id),
            &[("quantity", quantity.as_str())],
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn cart(&self) -> E2eResult<ApiResponse> {
        self.get("Получение содержимого корзины", "/cart").await
    }

    #[instrument(skip(self))]
    pub async fn customer_info(&self) -> E2eResult<ApiResponse> {
        self.get("Получение информации о пользователе", "/customer/info")
            .await
    }

    /// The customer info page requested the way a browser would
    #[instrument(skip(self))]
    pub async fn profile(&self) -> E2eResult<ApiResponse> {
        let url = self.url("/customer/info")?;
        let _step = self
            .report
            .as_ref()
            .map(|r| r.step("Получение данных профиля пользователя"));
        let response = self
            .client
            .get(url)
            .headers(default_headers())
            .send()
            .await?;
        ApiResponse::read(response).await
    }

    #[instrument(skip(self, order))]
    pub async fn checkout<T: Serialize + ?Sized>(&self, order: &T) -> E2eResult<ApiResponse> {
        self.post_form("Оформление заказа", "/checkout", order).await
    }

    /// Product listing of a category page such as `books`
    #[instrument(skip(self))]
    pub async fn category_products(&self, category: &str) -> E2eResult<ApiResponse> {
        self.get(
            "Получение списка товаров по категории",
            &format!("/{}", category.trim_start_matches('/')),
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn search_products(&self, query: &str) -> E2eResult<ApiResponse> {
        let mut url = self.url("/search")?;
        url.query_pairs_mut().append_pair("q", query);
        let _step = self.report.as_ref().map(|r| r.step("Поиск товаров"));
        ApiResponse::read(self.client.get(url).send().await?).await
    }

    #[instrument(skip(self))]
    pub async fn orders(&self) -> E2eResult<ApiResponse> {
        self.get("Получение списка заказов", "/order/history").await
    }

    #[instrument(skip(self))]
    pub async fn add_to_wishlist(&self, product_id: u32) -> E2eResult<ApiResponse> {
        let url = self.url(&format!("/addproducttocart/details/{}/2", product_id))?;
        let _step = self
            .report
            .as_ref()
            .map(|r| r.step("Добавление товара в список желаний"));
        ApiResponse::read(self.client.post(url).send().await?).await
    }

    #[instrument(skip(self))]
    pub async fn wishlist(&self) -> E2eResult<ApiResponse> {
        self.get("Получение списка желаний", "/wishlist").await
    }

    #[instrument(skip(self))]
    pub async fn subscribe_newsletter(&self, email: &str) -> E2eResult<ApiResponse> {
        self.post_form("Подписка на рассылку", "/subscribenewsletter", &[("email", email)])
            .await
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(concat!("demoshop-e2e/", env!("CARGO_PKG_VERSION"))),
    );
    headers
}
