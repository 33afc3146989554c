use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use yew::prelude::*;

const DISMISS_AFTER_MS: u32 = 4_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub id: u32,
    pub tone: Tone,
    pub title: String,
    pub body: String,
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct Notices {
    pub items: Vec<Notice>,
}

pub enum NoticeAction {
    Push(Notice),
    Dismiss(u32),
}

impl Reducible for Notices {
    type Action = NoticeAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match action {
            NoticeAction::Push(notice) => {
                let mut items = self.items.clone();
                items.push(notice);
                Rc::new(Self { items })
            }
            NoticeAction::Dismiss(id) => Rc::new(Self {
                items: self.items.iter().filter(|n| n.id != id).cloned().collect(),
            }),
        }
    }
}

#[derive(Clone, PartialEq)]
pub struct Notifier {
    handle: UseReducerHandle<Notices>,
    counter: Rc<RefCell<u32>>,
}

impl Notifier {
    pub fn success(&self, title: &str, body: impl Into<String>) {
        self.push(Tone::Success, title, body.into());
    }

    pub fn error(&self, title: &str, body: impl Into<String>) {
        self.push(Tone::Error, title, body.into());
    }

    fn push(&self, tone: Tone, title: &str, body: String) {
        let id = {
            let mut counter = self.counter.borrow_mut();
            *counter = counter.wrapping_add(1);
            *counter
        };
        self.handle.dispatch(NoticeAction::Push(Notice {
            id,
            tone,
            title: title.to_string(),
            body,
        }));
        let handle = self.handle.clone();
        Timeout::new(DISMISS_AFTER_MS, move || {
            handle.dispatch(NoticeAction::Dismiss(id))
        })
        .forget();
    }
}

#[hook]
pub fn use_notifier() -> Notifier {
    use_context::<Notifier>().expect("NoticeProvider missing from the component tree")
}

#[derive(Properties, PartialEq)]
pub struct NoticeProviderProps {
    pub children: Children,
}

#[function_component(NoticeProvider)]
pub fn notice_provider(props: &NoticeProviderProps) -> Html {
    let handle = use_reducer(Notices::default);
    let counter = use_mut_ref(|| 0u32);
    let on_dismiss = {
        let handle = handle.clone();
        Callback::from(move |id: u32| handle.dispatch(NoticeAction::Dismiss(id)))
    };

    html! {
        <ContextProvider<Notifier> context={Notifier { handle: handle.clone(), counter }}>
            { for props.children.iter() }
            <div class="fixed bottom-4 right-4 z-50 space-y-2 w-80">
                { for handle.items.iter().map(|notice| {
                    let id = notice.id;
                    let on_dismiss = on_dismiss.clone();
                    let class_name = match notice.tone {
                        Tone::Success => "bg-white border border-green-200 rounded-xl shadow-lg p-4",
                        Tone::Error => "bg-white border border-red-200 rounded-xl shadow-lg p-4",
                    };
                    html! {
                        <div class={class_name} onclick={Callback::from(move |_| on_dismiss.emit(id))}>
                            <p class={if notice.tone == Tone::Error { "text-sm font-bold text-red-600" } else { "text-sm font-bold text-green-700" }}>
                                { notice.title.clone() }
                            </p>
                            <p class="text-xs text-slate-500 mt-1">{ notice.body.clone() }</p>
                        </div>
                    }
                }) }
            </div>
        </ContextProvider<Notifier>>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_dismiss() {
        let notices = Rc::new(Notices::default());
        let notices = notices.reduce(NoticeAction::Push(Notice {
            id: 1,
            tone: Tone::Error,
            title: "Login Failed".into(),
            body: "Invalid email or password".into(),
        }));
        let notices = notices.reduce(NoticeAction::Push(Notice {
            id: 2,
            tone: Tone::Success,
            title: "Saved".into(),
            body: String::new(),
        }));
        assert_eq!(notices.items.len(), 2);
        let notices = notices.reduce(NoticeAction::Dismiss(1));
        assert_eq!(notices.items.len(), 1);
        assert_eq!(notices.items[0].title, "Saved");
    }
}
