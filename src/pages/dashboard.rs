use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::cancel::RequestScope;
use crate::error::AppError;
use crate::format::{date, deadline, naira};
use crate::icons::icon_plus;
use crate::models::{Order, OrderStatus, PaymentCategory};
use crate::pages::ReceiptLookup;
use crate::session::use_session;
use crate::ui::{error_banner, page_shell, table_message, StatCard, StatIcon, StatusBadge, PRIMARY_BUTTON};
use crate::workflow::payable_categories;
use crate::{use_navigate, Route};

const RECENT: usize = 5;

#[derive(Clone, Debug, PartialEq)]
pub struct StudentSummary {
    pub total_paid: f64,
    pub completed: usize,
    pub pending: usize,
    pub outstanding: Vec<PaymentCategory>,
    pub recent: Vec<Order>,
}

pub fn student_summary(orders: &[Order], categories: &[PaymentCategory]) -> StudentSummary {
    let completed: Vec<&Order> = orders.iter().filter(|o| o.is_completed()).collect();
    let mut recent = orders.to_vec();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent.truncate(RECENT);

    StudentSummary {
        total_paid: completed.iter().map(|o| o.total_amount).sum(),
        completed: completed.len(),
        pending: orders
            .iter()
            .filter(|o| o.status == OrderStatus::Pending)
            .count(),
        outstanding: payable_categories(categories, orders),
        recent,
    }
}

#[function_component(DashboardPage)]
pub fn dashboard_page() -> Html {
    let summary = use_state(|| None::<StudentSummary>);
    let error = use_state(|| None::<String>);
    let session = use_session();
    let navigate = use_navigate();

    {
        let summary = summary.clone();
        let error = error.clone();
        let session = session.clone();
        use_effect_with_deps(
            move |_| {
                let scope = RequestScope::new();
                let api = session.api().scoped(&scope);
                let task = scope.clone();
                spawn_local(async move {
                    let result: Result<StudentSummary, AppError> = async {
                        let orders = api.my_orders().await?;
                        let categories = api.active_categories().await?;
                        Ok(student_summary(&orders, &categories))
                    }
                    .await;
                    if task.is_cancelled() {
                        return;
                    }
                    match result {
                        Ok(data) => summary.set(Some(data)),
                        Err(err) => {
                            session.report(&err);
                            error.set(Some(err.to_string()));
                        }
                    }
                });
                move || scope.cancel()
            },
            (),
        );
    }

    let name = session
        .user()
        .map(|u| u.first_name().to_string())
        .unwrap_or_default();

    let pay_now = {
        let navigate = navigate.clone();
        Callback::from(move |_| navigate.emit(Route::Payments))
    };

    let body = match &*summary {
        None if error.is_some() => error_banner(&error),
        None => html! { <p class="text-muted-foreground">{"Loading..."}</p> },
        Some(data) => html! {
            <>
                <p class="text-muted-foreground">{ format!("Welcome back, {name}.") }</p>
                <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                    <StatCard title="Total Paid" value={naira(data.total_paid)} icon={StatIcon::Wallet} />
                    <StatCard title="Completed Payments" value={data.completed.to_string()} icon={StatIcon::Check} />
                    <StatCard title="Pending Payments" value={data.pending.to_string()} icon={StatIcon::Clock} />
                </div>

                <div class="bg-white rounded-[10px] shadow-sm border border-border p-5">
                    <h3 class="font-bold text-lg text-foreground mb-3">{"Outstanding Dues"}</h3>
                    if data.outstanding.is_empty() {
                        <p class="text-sm text-muted-foreground">{"You're all caught up. No outstanding dues."}</p>
                    } else {
                        <div class="divide-y divide-border">
                            { for data.outstanding.iter().map(|category| html! {
                                <div key={category.id.clone()} class="flex items-center justify-between py-3">
                                    <div>
                                        <p class="font-semibold text-foreground">{ category.title.clone() }</p>
                                        <p class="text-xs text-muted-foreground">{ format!("Due: {}", deadline(category.deadline)) }</p>
                                    </div>
                                    <span class="font-bold text-[#14532d]">{ naira(category.amount) }</span>
                                </div>
                            }) }
                        </div>
                    }
                </div>

                <div class="bg-white rounded-[10px] shadow-sm border border-border overflow-hidden">
                    <div class="p-5 border-b border-border">
                        <h3 class="font-bold text-lg text-foreground">{"Recent Payments"}</h3>
                    </div>
                    <table class="w-full text-left border-collapse">
                        <thead>
                            <tr class="bg-muted text-muted-foreground text-[10px] uppercase tracking-widest">
                                <th class="px-6 py-4 font-bold">{"Date"}</th>
                                <th class="px-6 py-4 font-bold">{"Payment"}</th>
                                <th class="px-6 py-4 font-bold">{"Status"}</th>
                                <th class="px-6 py-4 font-bold text-right">{"Amount"}</th>
                                <th class="px-6 py-4"></th>
                            </tr>
                        </thead>
                        <tbody class="divide-y divide-border">
                            if data.recent.is_empty() {
                                { table_message(5, "No payments yet.") }
                            } else {
                                { for data.recent.iter().map(|order| {
                                    let receipt = order.is_completed().then(|| {
                                        let navigate = navigate.clone();
                                        let lookup = ReceiptLookup::for_order(order);
                                        Callback::from(move |_| navigate.emit(Route::Receipt(lookup.clone())))
                                    });
                                    html! {
                                        <tr key={order.payment_reference.clone()} class="text-sm hover:bg-muted/40">
                                            <td class="px-6 py-4 text-muted-foreground">{ date(order.created_at) }</td>
                                            <td class="px-6 py-4 text-foreground">{ order.display_title().to_string() }</td>
                                            <td class="px-6 py-4"><StatusBadge status={order.status} /></td>
                                            <td class="px-6 py-4 text-right font-semibold">{ naira(order.total_amount) }</td>
                                            <td class="px-6 py-4 text-right">
                                                if let Some(onclick) = receipt {
                                                    <button class="text-[#16a34a] text-xs font-bold" onclick={onclick}>{"Receipt"}</button>
                                                }
                                            </td>
                                        </tr>
                                    }
                                }) }
                            }
                        </tbody>
                    </table>
                </div>
            </>
        },
    };

    page_shell(
        "Dashboard",
        html! {
            <button class={classes!(PRIMARY_BUTTON, "flex", "items-center", "gap-2")} onclick={pay_now}>
                { icon_plus() }
                {"Make Payment"}
            </button>
        },
        body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn category(id: &str, amount: f64) -> PaymentCategory {
        PaymentCategory {
            id: id.into(),
            title: format!("Dues {id}"),
            description: String::new(),
            amount,
            deadline: None,
            is_active: true,
        }
    }

    fn order(category: &str, status: OrderStatus, total: f64, day: u32) -> Order {
        Order {
            id: format!("o-{category}-{day}"),
            student_id: None,
            category_id: Some(category.into()),
            category_title: None,
            original_amount: total,
            gateway_fee: 0.0,
            total_amount: total,
            status,
            payment_reference: format!("REF-{day}"),
            transaction_reference: None,
            created_at: Some(Utc.with_ymd_and_hms(2024, 1, day, 9, 0, 0).unwrap()),
            paid_at: None,
            student_name: None,
            student_matric: None,
        }
    }

    #[test]
    fn test_summary_counts() {
        let orders = vec![
            order("c1", OrderStatus::Completed, 2050.0, 1),
            order("c2", OrderStatus::Pending, 1015.0, 2),
            order("c2", OrderStatus::Failed, 1015.0, 3),
        ];
        let categories = vec![category("c1", 2000.0), category("c2", 1000.0)];
        let summary = student_summary(&orders, &categories);
        assert_eq!(summary.total_paid, 2050.0);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.pending, 1);
        assert_eq!(summary.outstanding.len(), 1);
        assert_eq!(summary.outstanding[0].id, "c2");
    }

    #[test]
    fn test_recent_newest_first() {
        let orders: Vec<Order> = (1..=7)
            .map(|day| order("c1", OrderStatus::Failed, 10.0, day))
            .collect();
        let summary = student_summary(&orders, &[]);
        assert_eq!(summary.recent.len(), RECENT);
        assert_eq!(summary.recent[0].payment_reference, "REF-7");
    }
}
