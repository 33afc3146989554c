mod api;
mod cancel;
mod config;
mod error;
mod format;
mod guard;
mod icons;
mod layout;
mod listing;
mod models;
mod notify;
mod pages;
mod receipt;
mod session;
mod ui;
mod workflow;

use std::rc::Rc;

use tracing::info;
use web_sys::UrlSearchParams;
use yew::prelude::*;

use guard::{Guard, Requirement};
use layout::Layout;
use notify::{use_notifier, NoticeProvider};
use pages::admin::{AdminCategoriesPage, AdminDashboardPage, AdminStudentsPage, AdminTransactionsPage};
use pages::{
    DashboardPage, HistoryPage, LoginPage, PaymentsPage, ProfilePage, ReceiptLookup, ReceiptPage,
    RegisterPage,
};
use session::{use_session, BrowserStore, SessionProvider, SessionStore};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Dashboard,
    Payments,
    History,
    Receipt(ReceiptLookup),
    Profile,
    AdminDashboard,
    AdminTransactions,
    AdminCategories,
    AdminStudents,
}

impl Route {
    pub fn requirement(&self) -> Requirement {
        match self {
            Route::Login | Route::Register => Requirement::Guest,
            Route::AdminDashboard
            | Route::AdminTransactions
            | Route::AdminCategories
            | Route::AdminStudents => Requirement::Admin,
            Route::Profile
            | Route::Receipt(_)
            | Route::Dashboard
            | Route::Payments
            | Route::History => Requirement::SignedIn,
        }
    }

    /// The sidebar entry a route belongs to.
    pub fn section(&self) -> Route {
        match self {
            Route::Receipt(_) => Route::History,
            other => other.clone(),
        }
    }
}

/// Lets any page move the app to another route.
#[derive(Clone, PartialEq)]
pub struct Navigator(pub Callback<Route>);

#[hook]
pub fn use_navigate() -> Callback<Route> {
    use_context::<Navigator>()
        .map(|nav| nav.0)
        .unwrap_or_default()
}

/// The checkout returns with `?reference=` and, from some providers, only
/// `?trxref=`.
fn pick_reference(reference: Option<String>, trxref: Option<String>) -> Option<String> {
    reference
        .into_iter()
        .chain(trxref)
        .map(|r| r.trim().to_string())
        .find(|r| !r.is_empty())
}

fn checkout_reference() -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    let params = UrlSearchParams::new_with_str(&search).ok()?;
    pick_reference(params.get("reference"), params.get("trxref"))
}

#[function_component(App)]
fn app() -> Html {
    let store = use_memo(|_| SessionStore(Rc::new(BrowserStore)), ());
    html! {
        <SessionProvider store={(*store).clone()}>
            <NoticeProvider>
                <Shell />
            </NoticeProvider>
        </SessionProvider>
    }
}

#[function_component(Shell)]
fn shell() -> Html {
    let checkout = use_state(checkout_reference);
    let route = use_state(|| {
        if checkout.is_some() {
            Route::Payments
        } else {
            Route::Login
        }
    });
    let session = use_session();
    let notifier = use_notifier();

    use_effect_with_deps(
        |reference: &Option<String>| {
            if let Some(reference) = reference {
                info!("Returned from checkout with reference {}", reference);
            }
            || ()
        },
        (*checkout).clone(),
    );

    let navigate = {
        let route = route.clone();
        let checkout = checkout.clone();
        Callback::from(move |next: Route| {
            // the checkout reference belongs to the first Payments visit only
            if checkout.is_some() {
                checkout.set(None);
            }
            if *route != next {
                route.set(next);
            }
        })
    };

    let on_logout = {
        let navigate = navigate.clone();
        let session = session.clone();
        Callback::from(move |_| {
            session.sign_out();
            notifier.success("Signed out", "See you next time.");
            navigate.emit(Route::Login);
        })
    };

    let page = match &*route {
        Route::Login => html! { <LoginPage /> },
        Route::Register => html! { <RegisterPage /> },
        Route::Dashboard => html! { <DashboardPage /> },
        Route::Payments => html! { <PaymentsPage reference={(*checkout).clone()} /> },
        Route::History => html! { <HistoryPage /> },
        Route::Receipt(lookup) => html! { <ReceiptPage lookup={lookup.clone()} /> },
        Route::Profile => html! { <ProfilePage /> },
        Route::AdminDashboard => html! { <AdminDashboardPage /> },
        Route::AdminTransactions => html! { <AdminTransactionsPage /> },
        Route::AdminCategories => html! { <AdminCategoriesPage /> },
        Route::AdminStudents => html! { <AdminStudentsPage /> },
    };

    let requirement = route.requirement();
    let content = if requirement == Requirement::Guest {
        page
    } else {
        html! {
            <Layout active={(*route).clone()} on_select={navigate.clone()} on_logout={on_logout}>
                { page }
            </Layout>
        }
    };

    html! {
        <ContextProvider<Navigator> context={Navigator(navigate.clone())}>
            <Guard requirement={requirement} on_redirect={navigate}>
                { content }
            </Guard>
        </ContextProvider<Navigator>>
    }
}

fn main() {
    tracing_wasm::set_as_global_default();
    yew::Renderer::<App>::new().render();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_preferred_over_trxref() {
        assert_eq!(
            pick_reference(Some("NACOS-TXN-001234".into()), Some("other".into())),
            Some("NACOS-TXN-001234".to_string())
        );
    }

    #[test]
    fn test_trxref_fallback() {
        assert_eq!(
            pick_reference(None, Some(" T99 ".into())),
            Some("T99".to_string())
        );
        assert_eq!(
            pick_reference(Some(String::new()), Some("T99".into())),
            Some("T99".to_string())
        );
        assert_eq!(pick_reference(None, None), None);
    }

    #[test]
    fn test_route_requirements() {
        assert_eq!(Route::Login.requirement(), Requirement::Guest);
        assert_eq!(Route::AdminStudents.requirement(), Requirement::Admin);
        assert_eq!(Route::Payments.requirement(), Requirement::SignedIn);
    }

    #[test]
    fn test_receipt_highlights_history() {
        let route = Route::Receipt(ReceiptLookup::Order("o1".into()));
        assert_eq!(route.section(), Route::History);
    }
}
