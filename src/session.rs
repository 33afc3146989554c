//! Signed-in user, bearer token and their persisted copy.

use std::rc::Rc;

use tracing::{info, warn};
use yew::prelude::*;

use crate::api::wire::{Normalize, UserPayload};
use crate::api::ApiClient;
use crate::error::AppError;
use crate::models::{Credentials, User};

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

/// Where the session survives a reload.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

pub struct BrowserStore;

impl BrowserStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok().flatten())
    }
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage().and_then(|s| s.get_item(key).ok().flatten())
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = Self::storage() {
            if storage.set_item(key, value).is_err() {
                warn!("Could not persist {key}");
            }
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AuthStatus {
    /// Persisted state has not been read yet.
    #[default]
    Unknown,
    Authenticated,
    Anonymous,
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct Session {
    pub status: AuthStatus,
    pub user: Option<Rc<User>>,
    pub token: Option<Rc<str>>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self {
            status: AuthStatus::Anonymous,
            user: None,
            token: None,
        }
    }

    pub fn authenticated(token: &str, user: User) -> Self {
        Self {
            status: AuthStatus::Authenticated,
            user: Some(Rc::new(user)),
            token: Some(Rc::from(token)),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == AuthStatus::Authenticated
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().map(|u| u.is_admin()).unwrap_or(false)
    }
}

/// Reads the persisted token and user. Anything unusable is purged and the
/// session starts anonymous.
pub fn hydrate(store: &dyn KeyValueStore) -> Session {
    let token = store.get(TOKEN_KEY).filter(|t| !t.trim().is_empty());
    let raw_user = store.get(USER_KEY);

    let user = raw_user.as_deref().and_then(|raw| {
        serde_json::from_str::<UserPayload>(raw)
            .map(Normalize::normalize)
            .map_err(|e| warn!("Discarding corrupt persisted user: {e}"))
            .ok()
    });

    match (token, user) {
        (Some(token), Some(user)) if !user.id.is_empty() || !user.email.is_empty() => {
            info!("Restored session for {}", user.email);
            Session::authenticated(&token, user)
        }
        (None, None) if raw_user.is_none() => Session::anonymous(),
        _ => {
            purge(store);
            Session::anonymous()
        }
    }
}

pub fn persist(store: &dyn KeyValueStore, session: &Session) {
    match (session.status, &session.token, &session.user) {
        (AuthStatus::Authenticated, Some(token), Some(user)) => {
            store.set(TOKEN_KEY, token);
            match serde_json::to_string(user.as_ref()) {
                Ok(raw) => store.set(USER_KEY, &raw),
                Err(e) => warn!("Could not serialise user: {e}"),
            }
        }
        (AuthStatus::Anonymous, _, _) => purge(store),
        _ => {}
    }
}

pub fn purge(store: &dyn KeyValueStore) {
    store.remove(TOKEN_KEY);
    store.remove(USER_KEY);
}

pub enum SessionAction {
    Hydrated(Session),
    SignedIn(Credentials),
    /// Profile fields from the backend, in whatever spelling it used.
    Merge(UserPayload),
    SignedOut,
}

impl Reducible for Session {
    type Action = SessionAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match action {
            SessionAction::Hydrated(session) => Rc::new(session),
            SessionAction::SignedIn(creds) => {
                Rc::new(Session::authenticated(&creds.token, creds.user))
            }
            SessionAction::Merge(patch) => match &self.user {
                Some(current) => Rc::new(Session {
                    status: self.status,
                    user: Some(Rc::new(patch.merge_into(current))),
                    token: self.token.clone(),
                }),
                None => self,
            },
            SessionAction::SignedOut => Rc::new(Session::anonymous()),
        }
    }
}

/// Handle given to pages through context.
#[derive(Clone, PartialEq)]
pub struct SessionContext {
    handle: UseReducerHandle<Session>,
}

impl SessionContext {
    pub fn state(&self) -> &Session {
        &self.handle
    }

    pub fn user(&self) -> Option<Rc<User>> {
        self.handle.user.clone()
    }

    pub fn api(&self) -> ApiClient {
        ApiClient::new(self.handle.token.as_deref().map(str::to_string))
    }

    pub fn sign_in(&self, creds: Credentials) {
        self.handle.dispatch(SessionAction::SignedIn(creds));
    }

    pub fn update_user(&self, patch: UserPayload) {
        self.handle.dispatch(SessionAction::Merge(patch));
    }

    pub fn sign_out(&self) {
        info!("Signing out");
        self.handle.dispatch(SessionAction::SignedOut);
    }

    /// Expired or revoked tokens end the session.
    pub fn report(&self, err: &AppError) {
        if err.is_unauthorized() {
            warn!("Token rejected by backend, clearing session");
            self.sign_out();
        }
    }
}

#[hook]
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>().expect("SessionProvider missing from the component tree")
}

#[derive(Clone)]
pub struct SessionStore(pub Rc<dyn KeyValueStore>);

impl PartialEq for SessionStore {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Properties, PartialEq)]
pub struct SessionProviderProps {
    pub store: SessionStore,
    pub children: Children,
}

#[function_component(SessionProvider)]
pub fn session_provider(props: &SessionProviderProps) -> Html {
    let handle = use_reducer(Session::default);

    {
        let handle = handle.clone();
        let store = props.store.clone();
        use_effect_with_deps(
            move |_| {
                handle.dispatch(SessionAction::Hydrated(hydrate(store.0.as_ref())));
                || ()
            },
            (),
        );
    }

    {
        let store = props.store.clone();
        use_effect_with_deps(
            move |session: &Session| {
                persist(store.0.as_ref(), session);
                || ()
            },
            (*handle).clone(),
        );
    }

    html! {
        <ContextProvider<SessionContext> context={SessionContext { handle }}>
            { for props.children.iter() }
        </ContextProvider<SessionContext>>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryStore(RefCell<HashMap<String, String>>);

    impl KeyValueStore for MemoryStore {
        fn get(&self, key: &str) -> Option<String> {
            self.0.borrow().get(key).cloned()
        }

        fn set(&self, key: &str, value: &str) {
            self.0.borrow_mut().insert(key.to_string(), value.to_string());
        }

        fn remove(&self, key: &str) {
            self.0.borrow_mut().remove(key);
        }
    }

    fn user() -> User {
        User {
            id: "u1".into(),
            email: "ada@uni.edu".into(),
            full_name: "Ada Obi".into(),
            matric_number: "CSC/2021/001".into(),
            department: "Computer Science".into(),
            level: "300".into(),
            phone_number: "08012345678".into(),
            role: Role::Student,
            created_at: None,
        }
    }

    #[test]
    fn test_hydrate_empty_store() {
        let store = MemoryStore::default();
        let session = hydrate(&store);
        assert_eq!(session.status, AuthStatus::Anonymous);
        assert!(session.user.is_none());
    }

    #[test]
    fn test_hydrate_round_trip_with_persist() {
        let store = MemoryStore::default();
        persist(&store, &Session::authenticated("tok", user()));
        let session = hydrate(&store);
        assert!(session.is_authenticated());
        assert_eq!(session.token.as_deref(), Some("tok"));
        assert_eq!(session.user.as_deref(), Some(&user()));
    }

    #[test]
    fn test_hydrate_corrupt_user_purges() {
        let store = MemoryStore::default();
        store.set(TOKEN_KEY, "tok");
        store.set(USER_KEY, "{not json");
        let session = hydrate(&store);
        assert_eq!(session.status, AuthStatus::Anonymous);
        assert!(session.user.is_none());
        assert!(store.get(USER_KEY).is_none());
        assert!(store.get(TOKEN_KEY).is_none());
    }

    #[test]
    fn test_hydrate_token_without_user_purges() {
        let store = MemoryStore::default();
        store.set(TOKEN_KEY, "tok");
        let session = hydrate(&store);
        assert_eq!(session.status, AuthStatus::Anonymous);
        assert!(store.get(TOKEN_KEY).is_none());
    }

    #[test]
    fn test_hydrate_accepts_camel_case_user() {
        let store = MemoryStore::default();
        store.set(TOKEN_KEY, "tok");
        store.set(
            USER_KEY,
            r#"{"id":"u1","email":"ada@uni.edu","fullName":"Ada Obi","role":"admin"}"#,
        );
        let session = hydrate(&store);
        assert!(session.is_admin());
        assert_eq!(session.user.unwrap().full_name, "Ada Obi");
    }

    #[test]
    fn test_merge_replaces_user() {
        let before = Rc::new(Session::authenticated("tok", user()));
        let patch: UserPayload =
            serde_json::from_str(r#"{"full_name":"Ada N. Obi","phone":"0909"}"#).unwrap();
        let after = before.clone().reduce(SessionAction::Merge(patch));
        assert_eq!(before.user.as_ref().unwrap().full_name, "Ada Obi");
        let merged = after.user.as_ref().unwrap();
        assert_eq!(merged.full_name, "Ada N. Obi");
        assert_eq!(merged.phone_number, "0909");
        assert_eq!(merged.email, "ada@uni.edu");
        assert_eq!(after.token.as_deref(), Some("tok"));
    }

    #[test]
    fn test_merge_without_user_is_noop() {
        let before = Rc::new(Session::anonymous());
        let patch: UserPayload = serde_json::from_str(r#"{"full_name":"X"}"#).unwrap();
        let after = before.clone().reduce(SessionAction::Merge(patch));
        assert!(Rc::ptr_eq(&before, &after));
    }

    #[test]
    fn test_sign_out_then_persist_purges() {
        let store = MemoryStore::default();
        persist(&store, &Session::authenticated("tok", user()));
        let after = Rc::new(Session::authenticated("tok", user())).reduce(SessionAction::SignedOut);
        persist(&store, &after);
        assert!(store.get(TOKEN_KEY).is_none());
        assert!(store.get(USER_KEY).is_none());
    }

    #[test]
    fn test_unknown_status_does_not_touch_store() {
        let store = MemoryStore::default();
        store.set(TOKEN_KEY, "tok");
        persist(&store, &Session::default());
        assert_eq!(store.get(TOKEN_KEY).as_deref(), Some("tok"));
    }
}
