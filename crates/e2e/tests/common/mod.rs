//! Shared suite setup: live configuration and an emulated shop
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use demoshop_common::Severity;
use demoshop_e2e::data::{TestUser, LAPTOP, SIMPLE_COMPUTER};
use demoshop_e2e::{DemoWebShopApi, Report, SuiteConfig, TestMeta, TestReport};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const EPIC: &str = "DemoWebShop";
pub const OWNER: &str = "Yaroslav YAQA";
pub const EMAIL_EXISTS: &str = "The specified email already exists";
pub const PRODUCT_ADDED: &str = "The product has been added";

const AUTH_COOKIE: &str = "NOPCOMMERCE.AUTH=3F2A9C1D7E";

/// Report directory that lives as long as the test
pub struct ScratchReport {
    pub dir: tempfile::TempDir,
    pub report: Report,
}

impl ScratchReport {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create report dir");
        let report = Report::new(dir.path().join("allure-results"))
            .expect("create report")
            .with_latest_report(dir.path().join("latest-report.json"));
        Self { dir, report }
    }

    /// Where a previous run's summary is picked up from
    pub fn latest_report(&self) -> PathBuf {
        self.dir.path().join("latest-report.json")
    }

    pub fn start(&self, meta: TestMeta) -> Arc<TestReport> {
        self.report.start_test(meta)
    }

    /// Parsed `*-result.json` files written so far
    pub fn results(&self) -> Vec<serde_json::Value> {
        std::fs::read_dir(self.report.results_dir())
            .expect("read results dir")
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.to_string_lossy().ends_with("-result.json"))
            .map(|p| serde_json::from_str(&std::fs::read_to_string(p).unwrap()).unwrap())
            .collect()
    }
}

/// Names of the attachments made outside any step
pub fn attachment_names(result: &serde_json::Value) -> Vec<String> {
    result["attachments"]
        .as_array()
        .expect("attachments list")
        .iter()
        .map(|a| a["name"].as_str().expect("attachment name").to_string())
        .collect()
}

pub fn meta(feature: &str, story: &str, title: &str, severity: Severity) -> TestMeta {
    TestMeta::new(title)
        .epic(EPIC)
        .feature(feature)
        .story(story)
        .severity(severity)
        .owner(OWNER)
}

/// Configuration for suites that talk to the real shop
pub fn live_config() -> SuiteConfig {
    demoshop_e2e::init_test_tracing();
    SuiteConfig::from_env().expect("load suite configuration")
}

/// Report for live runs, written where the configuration says
pub fn live_report(config: &SuiteConfig) -> Report {
    Report::from_config(&config.report).expect("create results dir")
}

pub fn form_pair(key: &str, value: &str) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair(key, value)
        .finish()
}

/// A mock of the shop pages the suites touch
pub struct MockShop {
    pub server: MockServer,
}

impl MockShop {
    pub async fn start() -> Self {
        demoshop_e2e::init_test_tracing();
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn api(&self) -> DemoWebShopApi {
        DemoWebShopApi::with_base_url(&self.uri()).expect("mock server URI is a valid URL")
    }

    /// First registration of `user.email` succeeds, later ones are rejected
    pub async fn mount_registration(&self, user: &TestUser) {
        Mock::given(method("POST"))
            .and(path("/register"))
            .and(body_string_contains(form_pair("Email", &user.email)))
            .respond_with(ResponseTemplate::new(200).set_body_string(page(
                "Register",
                "<div class=\"result\">Your registration completed</div>",
            )))
            .up_to_n_times(1)
            .mount(&self.server)
            .await;

        Mock::given(method("POST"))
            .and(path("/register"))
            .and(body_string_contains(form_pair("Email", &user.email)))
            .respond_with(ResponseTemplate::new(200).set_body_string(page(
                "Register",
                &format!("<div class=\"validation-summary-errors\"><ul><li>{EMAIL_EXISTS}</li></ul></div>"),
            )))
            .mount(&self.server)
            .await;
    }

    /// Login with the user's credentials redirects home and sets the auth cookie
    pub async fn mount_login(&self, user: &TestUser) {
        Mock::given(method("POST"))
            .and(path("/login"))
            .and(body_string_contains(form_pair("Email", &user.email)))
            .and(body_string_contains(form_pair("Password", &user.password)))
            .and(body_string_contains("RememberMe=true"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("Location", "/")
                    .insert_header("Set-Cookie", format!("{AUTH_COOKIE}; path=/; HttpOnly").as_str()),
            )
            .mount(&self.server)
            .await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page(
                "Demo Web Shop",
                &format!("<a class=\"account\">{}</a>", user.email),
            )))
            .mount(&self.server)
            .await;
    }

    /// Cart endpoints answer only requests carrying the auth cookie
    pub async fn mount_cart(&self) {
        for product in [SIMPLE_COMPUTER, LAPTOP] {
            Mock::given(method("POST"))
                .and(path(format!("/addproducttocart/catalog/{}/1", product.id)))
                .and(header("cookie", AUTH_COOKIE))
                .and(body_string_contains("quantity="))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "success": true,
                    "message": "The product has been added to your <a href=\"/cart\">shopping cart</a>",
                    "updatetopcartsectionhtml": "(1)",
                })))
                .mount(&self.server)
                .await;
        }

        let rows = [SIMPLE_COMPUTER, LAPTOP]
            .iter()
            .map(|p| format!("<tr><td class=\"product\"><a class=\"product-name\">{}</a></td></tr>", p.name))
            .collect::<String>();
        Mock::given(method("GET"))
            .and(path("/cart"))
            .and(header("cookie", AUTH_COOKIE))
            .respond_with(ResponseTemplate::new(200).set_body_string(page(
                "Shopping cart",
                &format!("<div class=\"page-title\"><h1>Shopping cart</h1></div><table>{rows}</table>"),
            )))
            .mount(&self.server)
            .await;
    }

    /// Customer info page for a logged-in user
    pub async fn mount_profile(&self, user: &TestUser) {
        Mock::given(method("GET"))
            .and(path("/customer/info"))
            .and(header("cookie", AUTH_COOKIE))
            .respond_with(ResponseTemplate::new(200).set_body_string(page(
                "Customer info",
                &format!(
                    "<input id=\"FirstName\" value=\"{}\"/><input id=\"LastName\" value=\"{}\"/><input id=\"Email\" value=\"{}\"/>",
                    user.first_name, user.last_name, user.email
                ),
            )))
            .mount(&self.server)
            .await;
    }
}

fn page(title: &str, body: &str) -> String {
    format!("<html><head><title>Demo Web Shop. {title}</title></head><body>{body}</body></html>")
}
