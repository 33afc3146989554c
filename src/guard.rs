use yew::prelude::*;

use crate::session::{use_session, AuthStatus, Session};
use crate::Route;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Requirement {
    /// Login and registration: signed-in users are sent home.
    Guest,
    /// Any signed-in user, student or admin.
    SignedIn,
    Admin,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Access {
    /// Session not read yet; render nothing rather than flicker.
    Wait,
    Allow,
    Redirect(Route),
}

pub fn home_for(session: &Session) -> Route {
    if session.is_admin() {
        Route::AdminDashboard
    } else {
        Route::Dashboard
    }
}

pub fn decide(session: &Session, requirement: Requirement) -> Access {
    match (session.status, requirement) {
        (AuthStatus::Unknown, _) => Access::Wait,
        (AuthStatus::Anonymous, Requirement::Guest) => Access::Allow,
        (AuthStatus::Anonymous, _) => Access::Redirect(Route::Login),
        (AuthStatus::Authenticated, Requirement::Guest) => Access::Redirect(home_for(session)),
        (AuthStatus::Authenticated, Requirement::Admin) if !session.is_admin() => {
            Access::Redirect(Route::Dashboard)
        }
        (AuthStatus::Authenticated, _) => Access::Allow,
    }
}

#[derive(Properties, PartialEq)]
pub struct GuardProps {
    pub requirement: Requirement,
    pub on_redirect: Callback<Route>,
    pub children: Children,
}

#[function_component(Guard)]
pub fn guard(props: &GuardProps) -> Html {
    let session = use_session();
    let access = decide(session.state(), props.requirement);

    {
        let on_redirect = props.on_redirect.clone();
        use_effect_with_deps(
            move |access: &Access| {
                if let Access::Redirect(route) = access {
                    on_redirect.emit(route.clone());
                }
                || ()
            },
            access.clone(),
        );
    }

    match access {
        Access::Wait => html! {
            <div class="min-h-screen flex items-center justify-center bg-background text-muted-foreground">
                {"Checking session..."}
            </div>
        },
        Access::Allow => html! { <>{ for props.children.iter() }</> },
        Access::Redirect(_) => html! {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, User};

    fn signed_in(role: Role) -> Session {
        Session::authenticated(
            "tok",
            User {
                id: "u1".into(),
                email: "a@uni.edu".into(),
                full_name: "A".into(),
                matric_number: String::new(),
                department: String::new(),
                level: String::new(),
                phone_number: String::new(),
                role,
                created_at: None,
            },
        )
    }

    #[test]
    fn test_unknown_waits() {
        let session = Session::default();
        assert_eq!(decide(&session, Requirement::SignedIn), Access::Wait);
        assert_eq!(decide(&session, Requirement::Guest), Access::Wait);
    }

    #[test]
    fn test_anonymous_goes_to_login() {
        let session = Session::anonymous();
        assert_eq!(
            decide(&session, Requirement::Admin),
            Access::Redirect(Route::Login)
        );
        assert_eq!(decide(&session, Requirement::Guest), Access::Allow);
    }

    #[test]
    fn test_student_kept_out_of_admin() {
        let session = signed_in(Role::Student);
        assert_eq!(
            decide(&session, Requirement::Admin),
            Access::Redirect(Route::Dashboard)
        );
        assert_eq!(decide(&session, Requirement::SignedIn), Access::Allow);
    }

    #[test]
    fn test_admin_passes_signed_in_routes() {
        assert_eq!(
            decide(&signed_in(Role::Admin), Requirement::SignedIn),
            Access::Allow
        );
    }

    #[test]
    fn test_signed_in_guest_routes_home() {
        assert_eq!(
            decide(&signed_in(Role::Admin), Requirement::Guest),
            Access::Redirect(Route::AdminDashboard)
        );
        assert_eq!(
            decide(&signed_in(Role::Student), Requirement::Guest),
            Access::Redirect(Route::Dashboard)
        );
    }
}
