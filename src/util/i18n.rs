//! Language selection and the built-in message catalog.
//!
//! The active locale comes from the `?lang=` query parameter when it names a
//! supported language, else from the stored `selectedLanguage` preference,
//! else English. The catalog only covers strings the auth screens render;
//! full translation resources live outside this crate.

#[cfg(test)]
#[path = "i18n_test.rs"]
mod i18n_test;

use crate::util::storage;

pub const STORAGE_KEY: &str = "selectedLanguage";
pub const LANG_PARAM: &str = "lang";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Locale {
    #[default]
    En,
    Ru,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::Ru, Locale::En];

    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ru => "ru",
        }
    }

    /// Name shown in the language select.
    pub fn label(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Ru => "Russian",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.code().eq_ignore_ascii_case(code.trim()))
    }
}

/// Result of reconciling the URL parameter with the stored preference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LocaleResolution {
    pub locale: Locale,
    /// Write `locale` back to the stored preference.
    pub persist: bool,
    /// Rewrite the `lang` query parameter to `locale`.
    pub rewrite_url: bool,
}

/// Reconcile `?lang=` with the stored preference.
///
/// - supported URL value: use it and store it; URL already correct
/// - unsupported URL value: fall back to English, store it, fix the URL
/// - no URL value: use the stored (or default) value and add it to the URL
pub fn resolve_locale(url_lang: Option<&str>, stored: Option<&str>) -> LocaleResolution {
    match url_lang {
        Some(raw) => match Locale::from_code(raw) {
            Some(locale) => LocaleResolution { locale, persist: true, rewrite_url: false },
            None => LocaleResolution { locale: Locale::default(), persist: true, rewrite_url: true },
        },
        None => LocaleResolution {
            locale: stored.and_then(Locale::from_code).unwrap_or_default(),
            persist: false,
            rewrite_url: true,
        },
    }
}

pub fn read_preference() -> Option<String> {
    storage::load_string(STORAGE_KEY)
}

pub fn save_preference(locale: Locale) {
    storage::save_string(STORAGE_KEY, locale.code());
}

/// Replace (or add) the `lang` parameter in a query string, keeping the
/// other parameters in order. Returns the query without a leading `?`.
pub fn with_lang_param(search: &str, locale: Locale) -> String {
    let query = search.strip_prefix('?').unwrap_or(search);
    let mut out = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        if key != LANG_PARAM {
            out.append_pair(&key, &value);
        }
    }
    out.append_pair(LANG_PARAM, locale.code());
    out.finish()
}

/// Catalog keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Msg {
    AppName,
    Login,
    Logout,
    Username,
    Password,
    NewPassword,
    FullName,
    Email,
    ConfirmPassword,
    ForgotPassword,
    SignUp,
    NoAccount,
    HaveAccount,
    Register,
    ResetPassword,
    ResetPasswordHint,
    ForgotPasswordHint,
    Submit,
    Submitting,
    SendResetLink,
    BackToLogin,
    ToggleTheme,
    Error,
    Success,
    RequiredField,
    UsernameRequired,
    PasswordRequired,
    PasswordMin6,
    PasswordMin3,
    FullNameRequired,
    UsernameMin3,
    UsernameChars,
    EmailRequired,
    EmailInvalid,
    ConfirmRequired,
    PasswordsMustMatch,
    RegistrationSuccess,
    IncorrectCredentials,
    IncorrectUsername,
    ResetLinkSent,
    NetworkError,
    GeneralError,
    TokenMissing,
    TokenExpired,
    TokenExpiredMessage,
    UseDifferentPassword,
    ResetPasswordError,
    PasswordResetSuccess,
    PasswordResetSuccessMessage,
    NotFoundTitle,
    NotFoundText,
    ReturnHome,
    HomeTitle,
    AdminTitle,
    AdminText,
    ManagerTitle,
    ManagerText,
    SharedTitle,
    SharedText,
    Roles,
}

/// Look up `msg` in `locale`.
#[allow(clippy::too_many_lines)]
pub fn t(locale: Locale, msg: Msg) -> &'static str {
    let (en, ru) = match msg {
        Msg::AppName => ("Portal", "Портал"),
        Msg::Login => ("Login", "Вход"),
        Msg::Logout => ("Log out", "Выйти"),
        Msg::Username => ("Username", "Имя пользователя"),
        Msg::Password => ("Password", "Пароль"),
        Msg::NewPassword => ("New password", "Новый пароль"),
        Msg::FullName => ("Full name", "Полное имя"),
        Msg::Email => ("Email", "Эл. почта"),
        Msg::ConfirmPassword => ("Confirm password", "Подтвердите пароль"),
        Msg::ForgotPassword => ("Forgot password?", "Забыли пароль?"),
        Msg::SignUp => ("Sign up", "Зарегистрироваться"),
        Msg::NoAccount => ("Don't have an account?", "Нет аккаунта?"),
        Msg::HaveAccount => ("Already have an account?", "Уже есть аккаунт?"),
        Msg::Register => ("Register", "Регистрация"),
        Msg::ResetPassword => ("Reset password", "Сброс пароля"),
        Msg::ResetPasswordHint => (
            "Enter your username and a new password.",
            "Введите имя пользователя и новый пароль.",
        ),
        Msg::ForgotPasswordHint => (
            "Enter your username and we will email you a reset link.",
            "Введите имя пользователя, и мы отправим ссылку для сброса.",
        ),
        Msg::Submit => ("Submit", "Отправить"),
        Msg::Submitting => ("Submitting...", "Отправка..."),
        Msg::SendResetLink => ("Send reset link", "Отправить ссылку"),
        Msg::BackToLogin => ("Back to login", "Назад ко входу"),
        Msg::ToggleTheme => ("Toggle theme", "Сменить тему"),
        Msg::Error => ("Error", "Ошибка"),
        Msg::Success => ("Success", "Успешно"),
        Msg::RequiredField => ("This field is required", "Обязательное поле"),
        Msg::UsernameRequired => ("Username is required", "Введите имя пользователя"),
        Msg::PasswordRequired => ("Password is required", "Введите пароль"),
        Msg::PasswordMin6 => ("Password must be at least 6 characters", "Пароль должен быть не короче 6 символов"),
        Msg::PasswordMin3 => ("Password must be at least 3 characters", "Пароль должен быть не короче 3 символов"),
        Msg::FullNameRequired => ("Full name is required", "Введите полное имя"),
        Msg::UsernameMin3 => ("Username must be at least 3 characters", "Имя пользователя не короче 3 символов"),
        Msg::UsernameChars => (
            "Username can only contain letters, numbers and underscore",
            "Имя пользователя может содержать только буквы, цифры и подчёркивание",
        ),
        Msg::EmailRequired => ("Email is required", "Введите эл. почту"),
        Msg::EmailInvalid => ("Enter a valid email", "Введите корректный адрес"),
        Msg::ConfirmRequired => ("Confirm Password is required", "Подтвердите пароль"),
        Msg::PasswordsMustMatch => ("Passwords must match", "Пароли должны совпадать"),
        Msg::RegistrationSuccess => (
            "Registration successful. You can now log in.",
            "Регистрация прошла успешно. Теперь можно войти.",
        ),
        Msg::IncorrectCredentials => ("Incorrect username or password.", "Неверное имя пользователя или пароль."),
        Msg::IncorrectUsername => ("Incorrect username", "Неверное имя пользователя"),
        Msg::ResetLinkSent => ("Email verification sent to your mail", "Письмо для подтверждения отправлено"),
        Msg::NetworkError => (
            "Could not reach the server. Please try again.",
            "Не удалось связаться с сервером. Попробуйте ещё раз.",
        ),
        Msg::GeneralError => ("Something went wrong. Please try again.", "Что-то пошло не так. Попробуйте ещё раз."),
        Msg::TokenMissing => (
            "Token is missing. Please use the reset link from your email.",
            "Токен отсутствует. Используйте ссылку из письма.",
        ),
        Msg::TokenExpired => ("Token expired", "Срок действия токена истёк"),
        Msg::TokenExpiredMessage => (
            "Your reset link has expired. Please request a new one.",
            "Ссылка для сброса устарела. Запросите новую.",
        ),
        Msg::UseDifferentPassword => (
            "Please use a different password",
            "Используйте другой пароль",
        ),
        Msg::ResetPasswordError => ("Could not reset the password", "Не удалось сбросить пароль"),
        Msg::PasswordResetSuccess => ("Password reset", "Пароль сброшен"),
        Msg::PasswordResetSuccessMessage => (
            "Your password was changed and you are now signed in.",
            "Пароль изменён, вы вошли в систему.",
        ),
        Msg::NotFoundTitle => ("404 - Page Not Found", "404 - Страница не найдена"),
        Msg::NotFoundText => (
            "The page you are looking for may not be available or may have been moved.",
            "Страница недоступна или была перемещена.",
        ),
        Msg::ReturnHome => ("Return to Home Page", "Вернуться на главную"),
        Msg::HomeTitle => ("Home", "Главная"),
        Msg::AdminTitle => ("Admin Page", "Страница администратора"),
        Msg::AdminText => ("This page can only be viewed by admin users.", "Эту страницу видят только администраторы."),
        Msg::ManagerTitle => ("Manager Page", "Страница менеджера"),
        Msg::ManagerText => ("This page can only be viewed by manager users.", "Эту страницу видят только менеджеры."),
        Msg::SharedTitle => ("Shared Page", "Общая страница"),
        Msg::SharedText => (
            "This page can be viewed by both admin and manager users.",
            "Эту страницу видят администраторы и менеджеры.",
        ),
        Msg::Roles => ("Roles", "Роли"),
    };
    match locale {
        Locale::En => en,
        Locale::Ru => ru,
    }
}
