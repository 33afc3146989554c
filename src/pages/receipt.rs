use tracing::error;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::cancel::RequestScope;
use crate::config::config;
use crate::icons::icon_download;
use crate::models::{Order, Receipt};
use crate::notify::use_notifier;
use crate::receipt::{download, layout::ReceiptSheet, BusyFlag};
use crate::session::use_session;
use crate::ui::{error_banner, page_shell, PRIMARY_BUTTON, SECONDARY_BUTTON};
use crate::{use_navigate, Route};

/// How a receipt is looked up: by order id, or by payment reference when
/// the order id is unknown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReceiptLookup {
    Order(String),
    Reference(String),
}

impl ReceiptLookup {
    pub fn for_order(order: &Order) -> Self {
        if order.id.is_empty() {
            ReceiptLookup::Reference(order.payment_reference.clone())
        } else {
            ReceiptLookup::Order(order.id.clone())
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct ReceiptPageProps {
    pub lookup: ReceiptLookup,
}

#[function_component(ReceiptPage)]
pub fn receipt_page(props: &ReceiptPageProps) -> Html {
    let receipt = use_state(|| None::<Receipt>);
    let error = use_state(|| None::<String>);
    let busy = use_state(BusyFlag::default);
    let downloading = use_state(|| false);
    let session = use_session();
    let notifier = use_notifier();
    let navigate = use_navigate();

    {
        let receipt = receipt.clone();
        let error = error.clone();
        let session = session.clone();
        use_effect_with_deps(
            move |lookup: &ReceiptLookup| {
                let scope = RequestScope::new();
                let api = session.api().scoped(&scope);
                let task = scope.clone();
                let lookup = lookup.clone();
                receipt.set(None);
                error.set(None);
                spawn_local(async move {
                    let result = match &lookup {
                        ReceiptLookup::Order(id) => api.receipt(id).await,
                        ReceiptLookup::Reference(reference) => {
                            api.receipt_by_reference(reference).await
                        }
                    };
                    if task.is_cancelled() {
                        return;
                    }
                    match result {
                        Ok(data) => receipt.set(Some(data)),
                        Err(err) => {
                            session.report(&err);
                            error.set(Some(err.to_string()));
                        }
                    }
                });
                move || scope.cancel()
            },
            props.lookup.clone(),
        );
    }

    let on_download = {
        let receipt = receipt.clone();
        let downloading = downloading.clone();
        let busy = (*busy).clone();
        Callback::from(move |_| {
            let Some(data) = (*receipt).clone() else {
                return;
            };
            // a second click while rendering is ignored
            let Some(guard) = busy.try_acquire() else {
                return;
            };
            downloading.set(true);
            let downloading = downloading.clone();
            let notifier = notifier.clone();
            spawn_local(async move {
                let _guard = guard;
                match download(&data).await {
                    Ok(file_name) => notifier.success("Receipt Downloaded", file_name),
                    Err(err) => {
                        error!("Receipt export failed: {}", err);
                        notifier.error("Download Failed", err.to_string());
                    }
                }
                downloading.set(false);
            });
        })
    };

    let back = {
        let target = if session.state().is_admin() {
            Route::AdminTransactions
        } else {
            Route::History
        };
        Callback::from(move |_| navigate.emit(target.clone()))
    };

    let body = match &*receipt {
        None if error.is_some() => error_banner(&error),
        None => html! { <p class="text-muted-foreground">{"Loading receipt..."}</p> },
        Some(data) => preview(&ReceiptSheet::build(data, &config().receipt_logo)),
    };

    page_shell(
        "Receipt",
        html! {
            <div class="flex gap-3">
                <button class={SECONDARY_BUTTON} onclick={back}>{"Back"}</button>
                <button
                    class={classes!(PRIMARY_BUTTON, "flex", "items-center", "gap-2")}
                    disabled={receipt.is_none() || *downloading}
                    onclick={on_download}
                >
                    { icon_download() }
                    { if *downloading { "Preparing PDF..." } else { "Download PDF" } }
                </button>
            </div>
        },
        body,
    )
}

/// The same rows the PDF carries, as HTML.
fn preview(sheet: &ReceiptSheet) -> Html {
    html! {
        <div class="bg-white max-w-2xl mx-auto rounded-[10px] shadow-sm border border-border p-8 space-y-6">
            <div class="flex items-start justify-between border-b border-border pb-4">
                <div class="flex items-center gap-3">
                    <img src={sheet.logo.clone()} alt="NACOS" class="w-12 h-12 rounded-full" />
                    <div>
                        <p class="text-xl font-black text-[#14532d]">{"NACOS"}</p>
                        <p class="text-xs text-muted-foreground">{ sheet.organisation }</p>
                    </div>
                </div>
                <div class="text-right">
                    <p class="font-bold text-foreground">{ sheet.title }</p>
                    <p class="text-xs text-muted-foreground">{ format!("No. {}", sheet.receipt_number) }</p>
                    <p class="text-xs text-muted-foreground">{ sheet.issued.clone() }</p>
                </div>
            </div>
            { for sheet.sections.iter().map(|section| html! {
                <div>
                    <h4 class="text-sm font-bold text-[#14532d] mb-2">{ section.title }</h4>
                    <div class="divide-y divide-border">
                        { for section.rows.iter().map(|row| html! {
                            <div class="flex justify-between py-2 text-sm">
                                <span class="text-muted-foreground">{ row.label }</span>
                                <span class="font-semibold text-foreground">{ row.value.clone() }</span>
                            </div>
                        }) }
                    </div>
                </div>
            }) }
            <div class="flex justify-between items-center bg-muted rounded-lg px-5 py-4">
                <span class="font-bold text-foreground">{"Total paid"}</span>
                <span class="text-xl font-bold text-[#16a34a]">{ sheet.total.clone() }</span>
            </div>
            <p class="text-center text-xs text-muted-foreground">{ sheet.footer }</p>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderStatus;

    fn order(id: &str) -> Order {
        Order {
            id: id.into(),
            student_id: None,
            category_id: None,
            category_title: None,
            original_amount: 0.0,
            gateway_fee: 0.0,
            total_amount: 0.0,
            status: OrderStatus::Completed,
            payment_reference: "NACOS-TXN-1".into(),
            transaction_reference: None,
            created_at: None,
            paid_at: None,
            student_name: None,
            student_matric: None,
        }
    }

    #[test]
    fn test_lookup_prefers_order_id() {
        assert_eq!(
            ReceiptLookup::for_order(&order("o1")),
            ReceiptLookup::Order("o1".into())
        );
        assert_eq!(
            ReceiptLookup::for_order(&order("")),
            ReceiptLookup::Reference("NACOS-TXN-1".into())
        );
    }
}
