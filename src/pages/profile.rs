use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::wire::ProfileRequest;
use crate::error::AppError;
use crate::format::date;
use crate::models::Role;
use crate::notify::use_notifier;
use crate::session::use_session;
use crate::ui::{error_banner, on_text, page_shell, INPUT_CLASS, PRIMARY_BUTTON};

const MIN_PASSWORD: usize = 6;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProfileForm {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl ProfileForm {
    pub fn validate(&self) -> Result<ProfileRequest, AppError> {
        if self.full_name.trim().is_empty() || self.email.trim().is_empty() {
            return Err(AppError::validation("Name and email are required"));
        }
        if !self.email.contains('@') {
            return Err(AppError::validation("Please enter a valid email address"));
        }

        let changing_password = !self.current_password.is_empty()
            || !self.new_password.is_empty()
            || !self.confirm_password.is_empty();
        if changing_password {
            if self.current_password.is_empty() {
                return Err(AppError::validation(
                    "Enter your current password to set a new one",
                ));
            }
            if self.new_password.len() < MIN_PASSWORD {
                return Err(AppError::validation(format!(
                    "New password must be at least {MIN_PASSWORD} characters"
                )));
            }
            if self.new_password != self.confirm_password {
                return Err(AppError::validation("New passwords do not match"));
            }
        }

        let phone = self.phone_number.trim();
        Ok(ProfileRequest {
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            phone_number: (!phone.is_empty()).then(|| phone.to_string()),
            current_password: changing_password.then(|| self.current_password.clone()),
            new_password: changing_password.then(|| self.new_password.clone()),
        })
    }
}

fn labelled(label: &'static str, kind: &'static str, state: &UseStateHandle<String>) -> Html {
    html! {
        <div class="space-y-1">
            <label class="text-[12px] font-bold text-muted-foreground">{ label }</label>
            <input type={kind} class={INPUT_CLASS} value={(**state).clone()} oninput={on_text(state)} />
        </div>
    }
}

fn read_only(label: &'static str, value: String) -> Html {
    html! {
        <div class="space-y-1">
            <p class="text-[12px] font-bold text-muted-foreground">{ label }</p>
            <p class="text-sm text-foreground">{ if value.is_empty() { "—".to_string() } else { value } }</p>
        </div>
    }
}

#[function_component(ProfilePage)]
pub fn profile_page() -> Html {
    let session = use_session();
    let notifier = use_notifier();
    let user = session.user();

    let full_name = use_state(|| user.as_ref().map(|u| u.full_name.clone()).unwrap_or_default());
    let email = use_state(|| user.as_ref().map(|u| u.email.clone()).unwrap_or_default());
    let phone_number = use_state(|| user.as_ref().map(|u| u.phone_number.clone()).unwrap_or_default());
    let current_password = use_state(String::new);
    let new_password = use_state(String::new);
    let confirm_password = use_state(String::new);
    let error = use_state(|| None::<String>);
    let saving = use_state(|| false);

    let Some(user) = user else {
        return html! {};
    };

    let on_submit = {
        let form = ProfileForm {
            full_name: (*full_name).clone(),
            email: (*email).clone(),
            phone_number: (*phone_number).clone(),
            current_password: (*current_password).clone(),
            new_password: (*new_password).clone(),
            confirm_password: (*confirm_password).clone(),
        };
        let role = user.role;
        let error = error.clone();
        let saving = saving.clone();
        let current_password = current_password.clone();
        let new_password = new_password.clone();
        let confirm_password = confirm_password.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let request = match form.validate() {
                Ok(request) => request,
                Err(err) => {
                    error.set(Some(err.to_string()));
                    return;
                }
            };

            saving.set(true);
            error.set(None);

            let api = session.api();
            let session = session.clone();
            let notifier = notifier.clone();
            let error = error.clone();
            let saving = saving.clone();
            let current_password = current_password.clone();
            let new_password = new_password.clone();
            let confirm_password = confirm_password.clone();
            spawn_local(async move {
                match api.update_profile(role, &request).await {
                    Ok(patch) => {
                        session.update_user(patch);
                        current_password.set(String::new());
                        new_password.set(String::new());
                        confirm_password.set(String::new());
                        notifier.success("Profile Updated", "Your changes have been saved.");
                    }
                    Err(err) => {
                        session.report(&err);
                        notifier.error("Update Failed", err.to_string());
                        error.set(Some(err.to_string()));
                    }
                }
                saving.set(false);
            });
        })
    };

    page_shell(
        "Profile",
        html! {},
        html! {
            <form class="grid grid-cols-1 lg:grid-cols-2 gap-4" onsubmit={on_submit}>
                <div class="bg-white p-5 rounded-[10px] shadow-sm border border-border space-y-4">
                    <h4 class="text-[#14532d] font-bold text-[15px]">{"Personal Information"}</h4>
                    { labelled("Full name", "text", &full_name) }
                    { labelled("Email", "email", &email) }
                    { labelled("Phone number", "tel", &phone_number) }
                    if user.role == Role::Student {
                        <div class="grid grid-cols-2 gap-3">
                            { read_only("Matric number", user.matric_number.clone()) }
                            { read_only("Level", user.level.clone()) }
                            { read_only("Department", user.department.clone()) }
                            { read_only("Member since", date(user.created_at)) }
                        </div>
                    }
                </div>

                <div class="bg-white p-5 rounded-[10px] shadow-sm border border-border space-y-4">
                    <h4 class="text-[#14532d] font-bold text-[15px]">{"Change Password"}</h4>
                    <p class="text-xs text-muted-foreground">{"Leave blank to keep your current password."}</p>
                    { labelled("Current password", "password", &current_password) }
                    { labelled("New password", "password", &new_password) }
                    { labelled("Confirm new password", "password", &confirm_password) }
                </div>

                <div class="lg:col-span-2 space-y-3">
                    { error_banner(&error) }
                    <button type="submit" class={PRIMARY_BUTTON} disabled={*saving}>
                        { if *saving { "Saving..." } else { "Save Changes" } }
                    </button>
                </div>
            </form>
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ProfileForm {
        ProfileForm {
            full_name: "Ada Obi".into(),
            email: "ada@uni.edu".into(),
            ..ProfileForm::default()
        }
    }

    #[test]
    fn test_plain_update_sends_no_passwords() {
        let request = form().validate().unwrap();
        assert_eq!(request.current_password, None);
        assert_eq!(request.new_password, None);
        assert_eq!(request.phone_number, None);
    }

    #[test]
    fn test_name_and_email_required() {
        let mut f = form();
        f.full_name = "  ".into();
        assert_eq!(
            f.validate(),
            Err(AppError::validation("Name and email are required"))
        );
    }

    #[test]
    fn test_password_change_needs_current() {
        let mut f = form();
        f.new_password = "newpass".into();
        f.confirm_password = "newpass".into();
        assert!(f.validate().is_err());
        f.current_password = "oldpass".into();
        let request = f.validate().unwrap();
        assert_eq!(request.new_password.as_deref(), Some("newpass"));
        assert_eq!(request.current_password.as_deref(), Some("oldpass"));
    }

    #[test]
    fn test_current_password_alone_is_validated() {
        let mut f = form();
        f.current_password = "oldpass".into();
        assert!(matches!(f.validate(), Err(AppError::Validation(m)) if m.contains("at least 6")));
    }

    #[test]
    fn test_password_change_rules() {
        let mut f = form();
        f.current_password = "oldpass".into();
        f.new_password = "abc".into();
        f.confirm_password = "abc".into();
        assert!(matches!(f.validate(), Err(AppError::Validation(m)) if m.contains("at least 6")));
        f.new_password = "abcdef".into();
        f.confirm_password = "abcdeg".into();
        assert_eq!(
            f.validate(),
            Err(AppError::validation("New passwords do not match"))
        );
    }
}
