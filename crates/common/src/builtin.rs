//! Test cases of the Demo Web Shop suite

use crate::types::{Layer, Severity, TestCase};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[allow(clippy::too_many_arguments)]
fn case(
    automation: &str,
    id: &str,
    title: &str,
    description: &str,
    preconditions: &[&str],
    steps: &[&str],
    expected_result: &str,
    severity: Severity,
    layer: Layer,
    feature: &str,
    tags: &[&str],
) -> TestCase {
    TestCase {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        preconditions: strings(preconditions),
        steps: strings(steps),
        expected_result: expected_result.to_string(),
        severity,
        layer,
        feature: feature.to_string(),
        tags: strings(tags),
        automated: true,
        automation: Some(automation.to_string()),
    }
}

pub(crate) fn test_cases() -> Vec<TestCase> {
    vec![
        // Registration (UI)
        case(
            "test_successful_registration",
            "REG-001",
            "Успешная регистрация нового пользователя",
            "Проверка успешной регистрации пользователя с валидными данными",
            &[
                "Открыт браузер",
                "Пользователь находится на странице регистрации",
            ],
            &[
                "Заполнить поле Email валидным значением",
                "Заполнить поле Password",
                "Заполнить поле Confirm Password тем же значением",
                "Нажать кнопку Register",
            ],
            "Пользователь успешно зарегистрирован и авторизован в системе",
            Severity::Critical,
            Layer::Ui,
            "Registration",
            &["smoke", "registration", "positive"],
        ),
        case(
            "test_registration_with_existing_email",
            "REG-002",
            "Регистрация с существующим email",
            "Проверка невозможности регистрации с уже существующим email",
            &[
                "Открыт браузер",
                "В системе уже есть зарегистрированный пользователь",
                "Пользователь находится на странице регистрации",
            ],
            &[
                "Заполнить поле Email существующим значением",
                "Заполнить поле Password",
                "Заполнить поле Confirm Password",
                "Нажать кнопку Register",
            ],
            "Отображается сообщение об ошибке о существующем email",
            Severity::Critical,
            Layer::Ui,
            "Registration",
            &["registration", "negative"],
        ),
        // Login (UI)
        case(
            "test_successful_login",
            "LOGIN-001",
            "Успешный вход в систему",
            "Проверка входа в систему с валидными учетными данными",
            &["Открыт браузер", "Пользователь зарегистрирован в системе"],
            &[
                "Перейти на страницу логина",
                "Ввести валидный email",
                "Ввести валидный пароль",
                "Нажать кнопку Login",
            ],
            "Пользователь успешно авторизован",
            Severity::Blocker,
            Layer::Ui,
            "Login",
            &["smoke", "login", "positive"],
        ),
        // API
        case(
            "test_get_user_profile",
            "API-001",
            "Получение профиля пользователя",
            "Проверка получения данных профиля авторизованного пользователя",
            &[
                "Пользователь авторизован",
                "Получен валидный токен авторизации",
            ],
            &[
                "Отправить GET запрос на эндпоинт /api/profile",
                "Проверить статус код ответа",
                "Проверить структуру ответа",
            ],
            "Получен корректный ответ с данными профиля пользователя",
            Severity::Critical,
            Layer::Api,
            "User Profile",
            &["api", "profile", "smoke"],
        ),
        // Shopping cart (UI)
        case(
            "test_add_item_to_cart",
            "CART-001",
            "Добавление товара в корзину",
            "Проверка добавления товара в корзину авторизованным пользователем",
            &["Пользователь авторизован", "Открыта страница с товаром"],
            &[
                "Нажать кнопку 'Add to cart'",
                "Перейти в корзину",
                "Проверить наличие добавленного товара",
            ],
            "Товар успешно добавлен в корзину",
            Severity::Critical,
            Layer::Ui,
            "Shopping Cart",
            &["cart", "smoke", "positive"],
        ),
        case(
            "test_view_cart",
            "CART-002",
            "Просмотр содержимого корзины",
            "Проверка отображения содержимого корзины авторизованного пользователя",
            &["Пользователь авторизован", "В корзине есть товары"],
            &[
                "Открыть страницу корзины",
                "Проверить загрузку страницы",
                "Проверить отображение товаров",
            ],
            "Страница корзины успешно загружена, товары отображаются корректно",
            Severity::Critical,
            Layer::Ui,
            "Shopping Cart",
            &["cart", "smoke", "positive"],
        ),
        case(
            "test_add_multiple_products",
            "CART-003",
            "Добавление нескольких товаров в корзину",
            "Проверка добавления нескольких разных товаров в корзину",
            &[
                "Пользователь авторизован",
                "Доступны разные товары для добавления",
            ],
            &[
                "Добавить первый товар в корзину",
                "Проверить успешность добавления",
                "Добавить второй товар в корзину",
                "Проверить успешность добавления",
                "Открыть корзину",
                "Проверить наличие всех добавленных товаров",
            ],
            "Все товары успешно добавлены в корзину и отображаются в ней",
            Severity::Normal,
            Layer::Ui,
            "Shopping Cart",
            &["cart", "positive"],
        ),
    ]
}
