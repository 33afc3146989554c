use tracing::{info, warn};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::cancel::RequestScope;
use crate::config::config;
use crate::error::AppError;
use crate::format::{deadline, naira};
use crate::icons::{icon_alert, icon_check_circle, icon_clock};
use crate::models::{Order, PaymentCategory};
use crate::notify::use_notifier;
use crate::pages::ReceiptLookup;
use crate::session::use_session;
use crate::ui::{error_banner, page_shell, PRIMARY_BUTTON, SECONDARY_BUTTON};
use crate::workflow::{payable_categories, Catalog, FlowAction, PaymentFlow, Quote, Step};
use crate::{use_navigate, Route};

/// Drops `?reference=` from the address bar so a reload does not verify
/// the same payment again.
fn strip_checkout_query() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let location = window.location();
    if location.search().map(|s| s.is_empty()).unwrap_or(true) {
        return;
    }
    let path = location.pathname().unwrap_or_else(|_| "/".to_string());
    if let Ok(history) = window.history() {
        let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(&path));
    }
}

fn leave_for_checkout(url: &str) -> Result<(), AppError> {
    let window = web_sys::window().ok_or_else(|| AppError::Network("no window".to_string()))?;
    window
        .location()
        .set_href(url)
        .map_err(|_| AppError::Network("could not open the checkout page".to_string()))
}

#[derive(Properties, PartialEq)]
pub struct PaymentsPageProps {
    #[prop_or_default]
    pub reference: Option<String>,
}

#[function_component(PaymentsPage)]
pub fn payments_page(props: &PaymentsPageProps) -> Html {
    let flow = {
        let reference = props.reference.clone();
        use_reducer(move || PaymentFlow::starting_at(reference))
    };
    let session = use_session();
    let notifier = use_notifier();
    let navigate = use_navigate();

    // category list, once per entry into `select`
    {
        let flow = flow.clone();
        let session = session.clone();
        let deps = flow.catalog_key();
        use_effect_with_deps(
            move |&(epoch, in_select): &(u32, bool)| {
                let scope = RequestScope::new();
                if in_select {
                    let api = session.api().scoped(&scope);
                    let task = scope.clone();
                    spawn_local(async move {
                        let result: Result<Vec<PaymentCategory>, AppError> = async {
                            let categories = api.active_categories().await?;
                            let orders = api.my_orders().await?;
                            Ok(payable_categories(&categories, &orders))
                        }
                        .await;
                        if task.is_cancelled() {
                            return;
                        }
                        match result {
                            Ok(categories) => {
                                flow.dispatch(FlowAction::CatalogLoaded { epoch, categories })
                            }
                            Err(err) => {
                                session.report(&err);
                                flow.dispatch(FlowAction::CatalogFailed {
                                    epoch,
                                    message: err.to_string(),
                                });
                            }
                        }
                    });
                }
                move || scope.cancel()
            },
            deps,
        );
    }

    // one verification per entry into `verifying`
    {
        let flow = flow.clone();
        let session = session.clone();
        let notifier = notifier.clone();
        let reference = flow.verifying_reference().map(str::to_string);
        use_effect_with_deps(
            move |reference: &Option<String>| {
                let scope = RequestScope::new();
                if let Some(reference) = reference.clone() {
                    let api = session.api().scoped(&scope);
                    let task = scope.clone();
                    spawn_local(async move {
                        let result = api.verify(&reference).await;
                        if task.is_cancelled() {
                            return;
                        }
                        match result {
                            Ok(order) => {
                                if order.is_completed() {
                                    notifier.success(
                                        "Payment Successful",
                                        format!("{} has been paid.", order.display_title()),
                                    );
                                }
                                flow.dispatch(FlowAction::Verified(order));
                            }
                            Err(err) => {
                                warn!("Verification of {} failed: {}", reference, err);
                                session.report(&err);
                                flow.dispatch(FlowAction::VerifyFailed(err.to_string()));
                            }
                        }
                    });
                }
                move || scope.cancel()
            },
            reference,
        );
    }

    let restart = {
        let flow = flow.clone();
        Callback::from(move |_: MouseEvent| {
            strip_checkout_query();
            flow.dispatch(FlowAction::Restart);
        })
    };

    let choose = {
        let flow = flow.clone();
        Callback::from(move |category: PaymentCategory| flow.dispatch(FlowAction::Choose(category)))
    };

    let confirm = {
        let flow = flow.clone();
        let session = session.clone();
        let notifier = notifier.clone();
        Callback::from(move |_: MouseEvent| {
            let Step::Details { category, .. } = &flow.step else {
                return;
            };
            let category_id = category.id.clone();
            flow.dispatch(FlowAction::Confirm);

            let flow = flow.clone();
            let session = session.clone();
            let notifier = notifier.clone();
            let api = session.api();
            spawn_local(async move {
                let result = api
                    .create_order(&category_id, &config().checkout_callback())
                    .await
                    .and_then(|checkout| {
                        info!("Redirecting to checkout for {}", checkout.reference);
                        leave_for_checkout(&checkout.authorization_url)
                    });
                if let Err(err) = result {
                    session.report(&err);
                    notifier.error("Payment Failed", err.to_string());
                    flow.dispatch(FlowAction::CheckoutFailed(err.to_string()));
                }
            });
        })
    };

    let retry = {
        let flow = flow.clone();
        Callback::from(move |_: MouseEvent| flow.dispatch(FlowAction::Retry))
    };

    let open_receipt = {
        let navigate = navigate.clone();
        Callback::from(move |order: Order| {
            navigate.emit(Route::Receipt(ReceiptLookup::for_order(&order)))
        })
    };

    let body = match &flow.step {
        Step::Select => select_view(&flow.catalog, choose, restart),
        Step::Details { category, quote } => details_view(category, quote, confirm, restart),
        Step::Redirecting { category } => html! {
            <div class="bg-white rounded-[10px] border border-border p-8 text-center">
                <p class="font-semibold text-foreground">{ format!("Starting checkout for {}...", category.title) }</p>
                <p class="text-sm text-muted-foreground mt-2">{"You will be redirected to the secure payment page."}</p>
            </div>
        },
        Step::Verifying { reference } => html! {
            <div class="bg-white rounded-[10px] border border-border p-8 text-center">
                <p class="font-semibold text-foreground">{"Verifying your payment..."}</p>
                <p class="text-sm text-muted-foreground mt-2">{ format!("Reference: {reference}") }</p>
            </div>
        },
        Step::Success { order } => success_view(order, open_receipt, restart),
        Step::Pending { reference, .. } => {
            let check_again = {
                let flow = flow.clone();
                let reference = reference.clone();
                Callback::from(move |_: MouseEvent| flow.dispatch(FlowAction::Verify(reference.clone())))
            };
            html! {
                <div class="bg-white rounded-[10px] border border-amber-200 p-8 text-center space-y-4">
                    <div class="flex justify-center text-amber-600">{ icon_clock() }</div>
                    <h3 class="text-lg font-bold text-foreground">{"Payment Pending"}</h3>
                    <p class="text-sm text-muted-foreground">
                        {"Your payment has not been confirmed yet. This can take a few minutes."}
                    </p>
                    <p class="text-xs text-muted-foreground">{ format!("Reference: {reference}") }</p>
                    <div class="flex justify-center gap-3">
                        <button class={PRIMARY_BUTTON} onclick={check_again}>{"Check Again"}</button>
                        <button class={SECONDARY_BUTTON} onclick={restart}>{"Back to Payments"}</button>
                    </div>
                </div>
            }
        }
        Step::Failed { message, reference, .. } => html! {
            <div class="bg-white rounded-[10px] border border-red-200 p-8 text-center space-y-4">
                <div class="flex justify-center text-red-600">{ icon_alert() }</div>
                <h3 class="text-lg font-bold text-foreground">{"Payment Failed"}</h3>
                <p class="text-sm text-muted-foreground">{ message.clone() }</p>
                if let Some(reference) = reference {
                    <p class="text-xs text-muted-foreground">{ format!("Reference: {reference}") }</p>
                }
                <div class="flex justify-center gap-3">
                    <button class={PRIMARY_BUTTON} onclick={retry}>{"Try Again"}</button>
                    <button class={SECONDARY_BUTTON} onclick={restart}>{"Cancel"}</button>
                </div>
            </div>
        },
    };

    page_shell("Make Payment", html! {}, body)
}

fn select_view(catalog: &Catalog, choose: Callback<PaymentCategory>, reload: Callback<MouseEvent>) -> Html {
    match catalog {
        Catalog::Loading => html! { <p class="text-muted-foreground">{"Loading payment categories..."}</p> },
        Catalog::Failed(message) => html! {
            <div class="space-y-3">
                { error_banner(&Some(message.clone())) }
                <button class={SECONDARY_BUTTON} onclick={reload}>{"Retry"}</button>
            </div>
        },
        Catalog::Ready(categories) if categories.is_empty() => html! {
            <div class="bg-white rounded-[10px] border border-border p-8 text-center">
                <div class="flex justify-center text-green-600 mb-2">{ icon_check_circle() }</div>
                <p class="font-semibold text-foreground">{"No outstanding payments"}</p>
                <p class="text-sm text-muted-foreground mt-1">{"You have paid for every active category."}</p>
            </div>
        },
        Catalog::Ready(categories) => html! {
            <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-4">
                { for categories.iter().map(|category| {
                    let onclick = {
                        let choose = choose.clone();
                        let category = category.clone();
                        Callback::from(move |_: MouseEvent| choose.emit(category.clone()))
                    };
                    html! {
                        <div key={category.id.clone()} class="bg-white rounded-[10px] border border-border p-5 flex flex-col gap-3">
                            <div>
                                <h3 class="font-bold text-foreground">{ category.title.clone() }</h3>
                                <p class="text-sm text-muted-foreground">{ category.description.clone() }</p>
                            </div>
                            <p class="text-2xl font-bold text-[#14532d]">{ naira(category.amount) }</p>
                            <p class="text-xs text-muted-foreground">{ format!("Deadline: {}", deadline(category.deadline)) }</p>
                            <button class={PRIMARY_BUTTON} onclick={onclick}>{"Pay Now"}</button>
                        </div>
                    }
                }) }
            </div>
        },
    }
}

fn details_view(
    category: &PaymentCategory,
    quote: &Quote,
    confirm: Callback<MouseEvent>,
    cancel: Callback<MouseEvent>,
) -> Html {
    html! {
        <div class="bg-white max-w-lg rounded-[10px] border border-border p-6 space-y-4">
            <div>
                <h3 class="text-lg font-bold text-foreground">{ category.title.clone() }</h3>
                <p class="text-sm text-muted-foreground">{ category.description.clone() }</p>
            </div>
            <div class="divide-y divide-border text-sm">
                <div class="flex justify-between py-2">
                    <span class="text-muted-foreground">{"Amount"}</span>
                    <span class="font-semibold">{ naira(quote.amount) }</span>
                </div>
                <div class="flex justify-between py-2">
                    <span class="text-muted-foreground">{"Processing fee (estimated)"}</span>
                    <span class="font-semibold">{ naira(quote.estimated_fee) }</span>
                </div>
                <div class="flex justify-between py-2">
                    <span class="font-bold">{"Estimated total"}</span>
                    <span class="font-bold text-[#14532d]">{ naira(quote.estimated_total()) }</span>
                </div>
            </div>
            <p class="text-xs text-muted-foreground">{"The final fee is confirmed by the payment provider at checkout."}</p>
            <div class="flex gap-3">
                <button class={PRIMARY_BUTTON} onclick={confirm}>{"Proceed to Payment"}</button>
                <button class={SECONDARY_BUTTON} onclick={cancel}>{"Cancel"}</button>
            </div>
        </div>
    }
}

fn success_view(order: &Order, open_receipt: Callback<Order>, new_payment: Callback<MouseEvent>) -> Html {
    let view_receipt = {
        let order = order.clone();
        Callback::from(move |_: MouseEvent| open_receipt.emit(order.clone()))
    };
    html! {
        <div class="bg-white max-w-lg rounded-[10px] border border-green-200 p-6 space-y-4">
            <div class="flex items-center gap-3 text-green-600">
                { icon_check_circle() }
                <h3 class="text-lg font-bold text-foreground">{"Payment Successful"}</h3>
            </div>
            <div class="divide-y divide-border text-sm">
                <div class="flex justify-between py-2">
                    <span class="text-muted-foreground">{"Payment for"}</span>
                    <span class="font-semibold">{ order.display_title().to_string() }</span>
                </div>
                <div class="flex justify-between py-2">
                    <span class="text-muted-foreground">{"Amount"}</span>
                    <span class="font-semibold">{ naira(order.original_amount) }</span>
                </div>
                <div class="flex justify-between py-2">
                    <span class="text-muted-foreground">{"Processing fee"}</span>
                    <span class="font-semibold">{ naira(order.gateway_fee) }</span>
                </div>
                <div class="flex justify-between py-2">
                    <span class="font-bold">{"Total paid"}</span>
                    <span class="font-bold text-[#14532d]">{ naira(order.total_amount) }</span>
                </div>
                <div class="flex justify-between py-2">
                    <span class="text-muted-foreground">{"Reference"}</span>
                    <span class="font-mono text-xs">{ order.payment_reference.clone() }</span>
                </div>
            </div>
            <div class="flex gap-3">
                <button class={PRIMARY_BUTTON} onclick={view_receipt}>{"View Receipt"}</button>
                <button class={SECONDARY_BUTTON} onclick={new_payment}>{"New Payment"}</button>
            </div>
        </div>
    }
}
