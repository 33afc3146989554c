use tracing::warn;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::wire::RegisterRequest;
use crate::api::ApiClient;
use crate::config::config;
use crate::error::AppError;
use crate::notify::use_notifier;
use crate::session::use_session;
use crate::ui::{error_banner, on_select, on_text, INPUT_CLASS};
use crate::{use_navigate, Route};

const MIN_PASSWORD: usize = 6;
const LEVELS: [&str; 5] = ["100", "200", "300", "400", "500"];

pub fn validate_login(email: &str, password: &str) -> Result<(), AppError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(AppError::validation("Email and password are required"));
    }
    Ok(())
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RegisterForm {
    pub full_name: String,
    pub email: String,
    pub matric_number: String,
    pub phone_number: String,
    pub level: String,
    pub department: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<RegisterRequest, AppError> {
        let required = [
            &self.full_name,
            &self.email,
            &self.matric_number,
            &self.phone_number,
            &self.level,
            &self.department,
            &self.password,
        ];
        if required.iter().any(|v| v.trim().is_empty()) {
            return Err(AppError::validation("Please fill in all fields"));
        }
        if !self.email.contains('@') {
            return Err(AppError::validation("Please enter a valid email address"));
        }
        if self.password.len() < MIN_PASSWORD {
            return Err(AppError::validation(format!(
                "Password must be at least {MIN_PASSWORD} characters"
            )));
        }
        if self.password != self.confirm_password {
            return Err(AppError::validation("Passwords do not match"));
        }
        Ok(RegisterRequest {
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            matric_number: self.matric_number.trim().to_uppercase(),
            phone_number: self.phone_number.trim().to_string(),
            level: self.level.clone(),
            department: self.department.trim().to_string(),
            password: self.password.clone(),
            role: "student",
        })
    }
}

fn auth_card(title: &'static str, subtitle: &'static str, body: Html) -> Html {
    html! {
        <div class="min-h-screen flex items-center justify-center bg-background px-4">
            <div class="w-full max-w-md bg-card border border-border rounded-2xl shadow-lg p-8">
                <div class="text-center mb-6">
                    <img src={config().receipt_logo.clone()} alt="NACOS" class="w-14 h-14 mx-auto mb-3 rounded-full" />
                    <h1 class="text-2xl font-bold text-foreground">{ title }</h1>
                    <p class="text-sm text-muted-foreground mt-2">{ subtitle }</p>
                </div>
                { body }
            </div>
        </div>
    }
}

fn field(label: &'static str, kind: &'static str, state: &UseStateHandle<String>) -> Html {
    html! {
        <div class="space-y-1">
            <label class="text-sm font-medium text-foreground">{ label }</label>
            <input type={kind} class={INPUT_CLASS} value={(**state).clone()} oninput={on_text(state)} />
        </div>
    }
}

#[function_component(LoginPage)]
pub fn login_page() -> Html {
    let email = use_state(String::new);
    let password = use_state(String::new);
    let error = use_state(|| None::<String>);
    let loading = use_state(|| false);
    let session = use_session();
    let notifier = use_notifier();
    let navigate = use_navigate();

    let on_submit = {
        let email = email.clone();
        let password = password.clone();
        let error = error.clone();
        let loading = loading.clone();
        let navigate = navigate.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let email_val = (*email).trim().to_string();
            let password_val = (*password).clone();

            if let Err(err) = validate_login(&email_val, &password_val) {
                error.set(Some(err.to_string()));
                return;
            }

            loading.set(true);
            error.set(None);

            let error = error.clone();
            let loading = loading.clone();
            let session = session.clone();
            let notifier = notifier.clone();
            let navigate = navigate.clone();
            spawn_local(async move {
                match ApiClient::new(None).login(&email_val, &password_val).await {
                    Ok(creds) => {
                        let home = if creds.user.is_admin() {
                            Route::AdminDashboard
                        } else {
                            Route::Dashboard
                        };
                        notifier.success(
                            "Login Successful",
                            format!("Welcome back, {}!", creds.user.first_name()),
                        );
                        session.sign_in(creds);
                        navigate.emit(home);
                    }
                    Err(err) => {
                        warn!("Login failed: {}", err);
                        let msg = match err {
                            AppError::Unauthorized => "Invalid email or password".to_string(),
                            other => other.to_string(),
                        };
                        notifier.error("Login Failed", msg.clone());
                        error.set(Some(msg));
                    }
                }
                loading.set(false);
            });
        })
    };

    let to_register = Callback::from(move |_| navigate.emit(Route::Register));

    auth_card(
        "Welcome back",
        "Sign in to pay your departmental dues.",
        html! {
            <>
                <form class="space-y-4" onsubmit={on_submit}>
                    { field("Email", "email", &email) }
                    { field("Password", "password", &password) }
                    { error_banner(&error) }
                    <button
                        type="submit"
                        class="w-full bg-[#14532d] text-white py-2 rounded-lg font-semibold hover:opacity-90 transition-opacity"
                        disabled={*loading}
                    >
                        { if *loading { "Signing in..." } else { "Login" } }
                    </button>
                </form>
                <div class="mt-6 text-center text-sm text-muted-foreground">
                    {"No account?"}
                    <button class="ml-2 text-[#16a34a] font-semibold" onclick={to_register}>{"Sign up"}</button>
                </div>
            </>
        },
    )
}

#[function_component(RegisterPage)]
pub fn register_page() -> Html {
    let full_name = use_state(String::new);
    let email = use_state(String::new);
    let matric_number = use_state(String::new);
    let phone_number = use_state(String::new);
    let level = use_state(String::new);
    let department = use_state(|| "Computer Science".to_string());
    let password = use_state(String::new);
    let confirm_password = use_state(String::new);
    let error = use_state(|| None::<String>);
    let loading = use_state(|| false);
    let notifier = use_notifier();
    let navigate = use_navigate();

    let on_submit = {
        let form = RegisterForm {
            full_name: (*full_name).clone(),
            email: (*email).clone(),
            matric_number: (*matric_number).clone(),
            phone_number: (*phone_number).clone(),
            level: (*level).clone(),
            department: (*department).clone(),
            password: (*password).clone(),
            confirm_password: (*confirm_password).clone(),
        };
        let error = error.clone();
        let loading = loading.clone();
        let navigate = navigate.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let request = match form.validate() {
                Ok(request) => request,
                Err(err) => {
                    error.set(Some(err.to_string()));
                    return;
                }
            };

            loading.set(true);
            error.set(None);

            let error = error.clone();
            let loading = loading.clone();
            let notifier = notifier.clone();
            let navigate = navigate.clone();
            spawn_local(async move {
                match ApiClient::new(None).register(&request).await {
                    Ok(()) => {
                        notifier.success(
                            "Registration Successful",
                            "Your account has been created. Please sign in.",
                        );
                        navigate.emit(Route::Login);
                    }
                    Err(err) => {
                        warn!("Registration failed: {}", err);
                        notifier.error("Registration Failed", err.to_string());
                        error.set(Some(err.to_string()));
                    }
                }
                loading.set(false);
            });
        })
    };

    let to_login = Callback::from(move |_| navigate.emit(Route::Login));

    auth_card(
        "Create account",
        "Register with your matric number to get started.",
        html! {
            <>
                <form class="space-y-4" onsubmit={on_submit}>
                    { field("Full name", "text", &full_name) }
                    { field("Email", "email", &email) }
                    <div class="grid grid-cols-2 gap-3">
                        { field("Matric number", "text", &matric_number) }
                        { field("Phone number", "tel", &phone_number) }
                    </div>
                    <div class="grid grid-cols-2 gap-3">
                        <div class="space-y-1">
                            <label class="text-sm font-medium text-foreground">{"Level"}</label>
                            <select class={INPUT_CLASS} onchange={on_select(&level)}>
                                <option value="" selected={level.is_empty()}>{"Select level"}</option>
                                { for LEVELS.iter().map(|l| html! {
                                    <option value={*l} selected={*level == *l}>{ format!("{l} Level") }</option>
                                }) }
                            </select>
                        </div>
                        { field("Department", "text", &department) }
                    </div>
                    { field("Password", "password", &password) }
                    { field("Confirm password", "password", &confirm_password) }
                    { error_banner(&error) }
                    <button
                        type="submit"
                        class="w-full bg-[#14532d] text-white py-2 rounded-lg font-semibold hover:opacity-90 transition-opacity"
                        disabled={*loading}
                    >
                        { if *loading { "Creating account..." } else { "Sign up" } }
                    </button>
                </form>
                <div class="mt-6 text-center text-sm text-muted-foreground">
                    {"Already have an account?"}
                    <button class="ml-2 text-[#16a34a] font-semibold" onclick={to_login}>{"Login"}</button>
                </div>
            </>
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> RegisterForm {
        RegisterForm {
            full_name: " Ada Obi ".into(),
            email: "Ada@Uni.edu".into(),
            matric_number: "csc/2021/001".into(),
            phone_number: "08012345678".into(),
            level: "300".into(),
            department: "Computer Science".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
        }
    }

    #[test]
    fn test_login_requires_both_fields() {
        assert!(validate_login("", "x").is_err());
        assert!(validate_login("a@b.c", "").is_err());
        assert!(validate_login("a@b.c", "x").is_ok());
    }

    #[test]
    fn test_register_normalizes_fields() {
        let request = form().validate().unwrap();
        assert_eq!(request.full_name, "Ada Obi");
        assert_eq!(request.email, "ada@uni.edu");
        assert_eq!(request.matric_number, "CSC/2021/001");
        assert_eq!(request.role, "student");
    }

    #[test]
    fn test_register_rejects_missing_field() {
        let mut f = form();
        f.level.clear();
        assert_eq!(
            f.validate(),
            Err(AppError::validation("Please fill in all fields"))
        );
    }

    #[test]
    fn test_register_password_rules() {
        let mut short = form();
        short.password = "abc".into();
        short.confirm_password = "abc".into();
        assert!(matches!(short.validate(), Err(AppError::Validation(m)) if m.contains("at least 6")));

        let mut mismatch = form();
        mismatch.confirm_password = "secret2".into();
        assert_eq!(
            mismatch.validate(),
            Err(AppError::validation("Passwords do not match"))
        );
    }

    #[test]
    fn test_register_rejects_bad_email() {
        let mut f = form();
        f.email = "ada.uni.edu".into();
        assert!(f.validate().is_err());
    }
}
