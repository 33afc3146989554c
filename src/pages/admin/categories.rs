use chrono::NaiveDate;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::wire::{CategoryPayload, CategoryRequest};
use crate::error::AppError;
use crate::format::{deadline, naira};
use crate::icons::icon_plus;
use crate::listing::{use_list_query, use_paged_list, QueryAction};
use crate::models::PaymentCategory;
use crate::notify::use_notifier;
use crate::session::use_session;
use crate::ui::{
    error_banner, on_text, page_shell, table_error, table_message, Pager, SearchBar, INPUT_CLASS,
    PRIMARY_BUTTON, SECONDARY_BUTTON,
};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CategoryForm {
    /// Set when editing an existing category.
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub amount: String,
    pub deadline: String,
    pub is_active: bool,
}

impl CategoryForm {
    pub fn blank() -> Self {
        Self {
            is_active: true,
            ..Self::default()
        }
    }

    pub fn editing(category: &PaymentCategory) -> Self {
        Self {
            id: Some(category.id.clone()),
            title: category.title.clone(),
            description: category.description.clone(),
            amount: format!("{:.2}", category.amount),
            deadline: category
                .deadline
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            is_active: category.is_active,
        }
    }

    pub fn validate(&self) -> Result<CategoryRequest, AppError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(AppError::validation("Title is required"));
        }
        let amount: f64 = self
            .amount
            .trim()
            .replace(',', "")
            .parse()
            .map_err(|_| AppError::validation("Amount must be a number"))?;
        if !amount.is_finite() || amount <= 0.0 {
            return Err(AppError::validation("Amount must be greater than zero"));
        }
        let day = NaiveDate::parse_from_str(self.deadline.trim(), "%Y-%m-%d")
            .map_err(|_| AppError::validation("Deadline must be a date (YYYY-MM-DD)"))?;

        Ok(CategoryRequest {
            title: title.to_string(),
            description: self.description.trim().to_string(),
            amount: (amount * 100.0).round() / 100.0,
            deadline: day.format("%Y-%m-%d").to_string(),
            is_active: self.is_active,
        })
    }
}

#[derive(Properties, PartialEq)]
struct EditorProps {
    form: CategoryForm,
    on_saved: Callback<PaymentCategory>,
    on_close: Callback<()>,
}

#[function_component(CategoryEditor)]
fn category_editor(props: &EditorProps) -> Html {
    let title = use_state(|| props.form.title.clone());
    let description = use_state(|| props.form.description.clone());
    let amount = use_state(|| props.form.amount.clone());
    let deadline_text = use_state(|| props.form.deadline.clone());
    let is_active = use_state(|| props.form.is_active);
    let error = use_state(|| None::<String>);
    let saving = use_state(|| false);
    let session = use_session();

    let on_submit = {
        let form = CategoryForm {
            id: props.form.id.clone(),
            title: (*title).clone(),
            description: (*description).clone(),
            amount: (*amount).clone(),
            deadline: (*deadline_text).clone(),
            is_active: *is_active,
        };
        let error = error.clone();
        let saving = saving.clone();
        let on_saved = props.on_saved.clone();
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
            let id = form.id.clone();
            let error = error.clone();
            let saving = saving.clone();
            let on_saved = on_saved.clone();
            spawn_local(async move {
                match api.save_category(id.as_deref(), &request).await {
                    Ok(saved) => on_saved.emit(saved),
                    Err(err) => {
                        session.report(&err);
                        error.set(Some(err.to_string()));
                    }
                }
                saving.set(false);
            });
        })
    };

    let on_toggle_active = {
        let is_active = is_active.clone();
        Callback::from(move |_: Event| is_active.set(!*is_active))
    };
    let on_close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    html! {
        <form class="bg-white p-5 rounded-[10px] shadow-sm border border-border space-y-4" onsubmit={on_submit}>
            <h4 class="text-[#14532d] font-bold text-[15px]">
                { if props.form.id.is_some() { "Edit Category" } else { "New Category" } }
            </h4>
            <div class="grid grid-cols-1 md:grid-cols-3 gap-3">
                <div class="space-y-1">
                    <label class="text-[12px] font-bold text-muted-foreground">{"Title"}</label>
                    <input type="text" class={INPUT_CLASS} value={(*title).clone()} oninput={on_text(&title)} />
                </div>
                <div class="space-y-1">
                    <label class="text-[12px] font-bold text-muted-foreground">{"Amount (₦)"}</label>
                    <input type="number" step="0.01" class={INPUT_CLASS} value={(*amount).clone()} oninput={on_text(&amount)} />
                </div>
                <div class="space-y-1">
                    <label class="text-[12px] font-bold text-muted-foreground">{"Deadline"}</label>
                    <input type="date" class={INPUT_CLASS} value={(*deadline_text).clone()} oninput={on_text(&deadline_text)} />
                </div>
            </div>
            <div class="space-y-1">
                <label class="text-[12px] font-bold text-muted-foreground">{"Description"}</label>
                <input type="text" class={INPUT_CLASS} value={(*description).clone()} oninput={on_text(&description)} />
            </div>
            <label class="flex items-center gap-2 text-sm text-foreground">
                <input type="checkbox" checked={*is_active} onchange={on_toggle_active} />
                {"Active (visible to students)"}
            </label>
            { error_banner(&error) }
            <div class="flex gap-3">
                <button type="submit" class={PRIMARY_BUTTON} disabled={*saving}>
                    { if *saving { "Saving..." } else { "Save" } }
                </button>
                <button type="button" class={SECONDARY_BUTTON} onclick={on_close}>{"Cancel"}</button>
            </div>
        </form>
    }
}

fn confirm_delete(title: &str) -> bool {
    web_sys::window()
        .and_then(|w| {
            w.confirm_with_message(&format!("Delete \"{title}\"? This cannot be undone."))
                .ok()
        })
        .unwrap_or(false)
}

#[function_component(AdminCategoriesPage)]
pub fn admin_categories_page() -> Html {
    let (query, search) = use_list_query("is_active");
    let list = use_paged_list::<CategoryPayload>("/payment-categories/admin", (*query).clone());
    let editing = use_state(|| None::<CategoryForm>);
    let session = use_session();
    let notifier = use_notifier();

    let reload = {
        let query = query.clone();
        Callback::from(move |_: ()| query.dispatch(QueryAction::Reload))
    };

    let on_search = {
        let search = search.clone();
        Callback::from(move |value: String| search.set(value))
    };
    let on_filter = {
        let query = query.clone();
        Callback::from(move |e: Event| {
            let select: web_sys::HtmlSelectElement = e.target_unchecked_into();
            let value = select.value();
            query.dispatch(QueryAction::Filter((value != "all").then_some(value)));
        })
    };
    let on_page = {
        let query = query.clone();
        Callback::from(move |page: u32| query.dispatch(QueryAction::Page(page)))
    };
    let on_new = {
        let editing = editing.clone();
        Callback::from(move |_: MouseEvent| editing.set(Some(CategoryForm::blank())))
    };
    let on_saved = {
        let editing = editing.clone();
        let reload = reload.clone();
        let notifier = notifier.clone();
        Callback::from(move |saved: PaymentCategory| {
            notifier.success("Category Saved", format!("{} has been saved.", saved.title));
            editing.set(None);
            reload.emit(());
        })
    };
    let on_close = {
        let editing = editing.clone();
        Callback::from(move |_| editing.set(None))
    };

    let toggle = {
        let session = session.clone();
        let notifier = notifier.clone();
        let reload = reload.clone();
        Callback::from(move |category: PaymentCategory| {
            let api = session.api();
            let session = session.clone();
            let notifier = notifier.clone();
            let reload = reload.clone();
            spawn_local(async move {
                match api.toggle_category(&category.id).await {
                    Ok(()) => {
                        let state = if category.is_active { "deactivated" } else { "activated" };
                        notifier.success("Category Updated", format!("{} {}.", category.title, state));
                        reload.emit(());
                    }
                    Err(err) => {
                        session.report(&err);
                        notifier.error("Update Failed", err.to_string());
                    }
                }
            });
        })
    };

    let delete = {
        let session = session.clone();
        let notifier = notifier.clone();
        let reload = reload.clone();
        Callback::from(move |category: PaymentCategory| {
            if !confirm_delete(&category.title) {
                return;
            }
            let api = session.api();
            let session = session.clone();
            let notifier = notifier.clone();
            let reload = reload.clone();
            spawn_local(async move {
                match api.delete_category(&category.id).await {
                    Ok(()) => {
                        notifier.success("Category Deleted", format!("{} was removed.", category.title));
                        reload.emit(());
                    }
                    Err(err) => {
                        session.report(&err);
                        notifier.error("Delete Failed", err.to_string());
                    }
                }
            });
        })
    };

    let selected = query.filter.clone().unwrap_or_else(|| "all".to_string());

    let rows = match (&list.page, &list.error) {
        (_, Some(message)) => table_error(6, message, reload.clone()),
        (None, None) => table_message(6, "Loading..."),
        (Some(page), None) if page.items.is_empty() => table_message(6, "No payment categories yet."),
        (Some(page), None) => html! {
            { for page.items.iter().map(|category| {
                let on_edit = {
                    let editing = editing.clone();
                    let form = CategoryForm::editing(category);
                    Callback::from(move |_: MouseEvent| editing.set(Some(form.clone())))
                };
                let on_toggle = {
                    let toggle = toggle.clone();
                    let category = category.clone();
                    Callback::from(move |_: MouseEvent| toggle.emit(category.clone()))
                };
                let on_delete = {
                    let delete = delete.clone();
                    let category = category.clone();
                    Callback::from(move |_: MouseEvent| delete.emit(category.clone()))
                };
                html! {
                    <tr key={category.id.clone()} class="text-sm hover:bg-muted/40">
                        <td class="px-6 py-4">
                            <p class="text-foreground font-medium">{ category.title.clone() }</p>
                            <p class="text-xs text-muted-foreground">{ category.description.clone() }</p>
                        </td>
                        <td class="px-6 py-4 font-semibold">{ naira(category.amount) }</td>
                        <td class="px-6 py-4 text-muted-foreground">{ deadline(category.deadline) }</td>
                        <td class="px-6 py-4">
                            if category.is_active {
                                <span class="bg-green-100 text-green-700 px-2.5 py-1 rounded-md text-[10px] font-bold">{"Active"}</span>
                            } else {
                                <span class="bg-slate-100 text-slate-600 px-2.5 py-1 rounded-md text-[10px] font-bold">{"Inactive"}</span>
                            }
                        </td>
                        <td class="px-6 py-4 text-right space-x-3">
                            <button class="text-[#14532d] text-xs font-bold" onclick={on_edit}>{"Edit"}</button>
                            <button class="text-amber-600 text-xs font-bold" onclick={on_toggle}>
                                { if category.is_active { "Deactivate" } else { "Activate" } }
                            </button>
                            <button class="text-red-600 text-xs font-bold" onclick={on_delete}>{"Delete"}</button>
                        </td>
                    </tr>
                }
            }) }
        },
    };

    page_shell(
        "Payment Categories",
        html! {
            <button class={classes!(PRIMARY_BUTTON, "flex", "items-center", "gap-2")} onclick={on_new}>
                { icon_plus() }
                {"New Category"}
            </button>
        },
        html! {
            <>
                if let Some(form) = &*editing {
                    <CategoryEditor
                        key={form.id.clone().unwrap_or_else(|| "new".to_string())}
                        form={form.clone()}
                        on_saved={on_saved}
                        on_close={on_close}
                    />
                }
                <div class="flex flex-col md:flex-row gap-3">
                    <SearchBar value={(*search).clone()} placeholder="Search categories" on_input={on_search} />
                    <select class={classes!(INPUT_CLASS, "md:w-48")} onchange={on_filter}>
                        <option value="all" selected={selected == "all"}>{"All categories"}</option>
                        <option value="true" selected={selected == "true"}>{"Active"}</option>
                        <option value="false" selected={selected == "false"}>{"Inactive"}</option>
                    </select>
                </div>
                <div class="bg-white rounded-[10px] shadow-sm border border-border overflow-hidden">
                    <div class="overflow-x-auto">
                        <table class="w-full text-left border-collapse">
                            <thead>
                                <tr class="bg-muted text-muted-foreground text-[10px] uppercase tracking-widest">
                                    <th class="px-6 py-4 font-bold">{"Category"}</th>
                                    <th class="px-6 py-4 font-bold">{"Amount"}</th>
                                    <th class="px-6 py-4 font-bold">{"Deadline"}</th>
                                    <th class="px-6 py-4 font-bold">{"Status"}</th>
                                    <th class="px-6 py-4"></th>
                                </tr>
                            </thead>
                            <tbody class="divide-y divide-border">
                                { rows }
                            </tbody>
                        </table>
                    </div>
                    if let Some(page) = &list.page {
                        <Pager pagination={page.pagination.clone()} on_page={on_page} />
                    }
                </div>
            </>
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> CategoryForm {
        CategoryForm {
            title: " NACOS Dues ".into(),
            description: "Annual dues".into(),
            amount: "2,000".into(),
            deadline: "2024-12-31".into(),
            ..CategoryForm::blank()
        }
    }

    #[test]
    fn test_valid_category() {
        let request = form().validate().unwrap();
        assert_eq!(request.title, "NACOS Dues");
        assert_eq!(request.amount, 2000.0);
        assert_eq!(request.deadline, "2024-12-31");
        assert!(request.is_active);
    }

    #[test]
    fn test_title_required() {
        let mut f = form();
        f.title = "   ".into();
        assert_eq!(f.validate(), Err(AppError::validation("Title is required")));
    }

    #[test]
    fn test_amount_must_be_positive() {
        let mut f = form();
        f.amount = "0".into();
        assert!(f.validate().is_err());
        f.amount = "abc".into();
        assert_eq!(f.validate(), Err(AppError::validation("Amount must be a number")));
    }

    #[test]
    fn test_deadline_format() {
        let mut f = form();
        f.deadline = "31/12/2024".into();
        assert!(f.validate().is_err());
    }

    #[test]
    fn test_editing_round_trips_fields() {
        let category = PaymentCategory {
            id: "c9".into(),
            title: "Lab Levy".into(),
            description: String::new(),
            amount: 1500.5,
            deadline: NaiveDate::from_ymd_opt(2025, 1, 15),
            is_active: false,
        };
        let f = CategoryForm::editing(&category);
        assert_eq!(f.id.as_deref(), Some("c9"));
        assert_eq!(f.amount, "1500.50");
        assert_eq!(f.deadline, "2025-01-15");
        let request = f.validate().unwrap();
        assert_eq!(request.amount, 1500.5);
        assert!(!request.is_active);
    }
}
