use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::cancel::RequestScope;
use crate::format::{date_time, naira};
use crate::models::{Order, OrderStatus};
use crate::pages::ReceiptLookup;
use crate::session::use_session;
use crate::ui::{error_banner, on_select, page_shell, table_message, SearchBar, StatusBadge, INPUT_CLASS};
use crate::{use_navigate, Route};

/// Newest first, narrowed by free text (title or reference) and status.
pub fn filter_orders(orders: &[Order], search: &str, status: Option<OrderStatus>) -> Vec<Order> {
    let needle = search.trim().to_lowercase();
    let mut matched: Vec<Order> = orders
        .iter()
        .filter(|o| status.map_or(true, |s| o.status == s))
        .filter(|o| {
            needle.is_empty()
                || o.display_title().to_lowercase().contains(&needle)
                || o.payment_reference.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect();
    matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    matched
}

fn parse_status_filter(raw: &str) -> Option<OrderStatus> {
    match raw {
        "" | "all" => None,
        other => Some(OrderStatus::parse(other)),
    }
}

#[function_component(HistoryPage)]
pub fn history_page() -> Html {
    let orders = use_state(|| None::<Vec<Order>>);
    let error = use_state(|| None::<String>);
    let search = use_state(String::new);
    let status = use_state(|| "all".to_string());
    let session = use_session();
    let navigate = use_navigate();

    {
        let orders = orders.clone();
        let error = error.clone();
        use_effect_with_deps(
            move |_| {
                let scope = RequestScope::new();
                let api = session.api().scoped(&scope);
                let task = scope.clone();
                spawn_local(async move {
                    let result = api.my_orders().await;
                    if task.is_cancelled() {
                        return;
                    }
                    match result {
                        Ok(list) => orders.set(Some(list)),
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

    let on_search = {
        let search = search.clone();
        Callback::from(move |value: String| search.set(value))
    };

    let rows = match &*orders {
        None if error.is_some() => table_message(6, "Could not load your payments."),
        None => table_message(6, "Loading..."),
        Some(list) => {
            let visible = filter_orders(list, &search, parse_status_filter(&status));
            if visible.is_empty() {
                table_message(6, "No payments match your search.")
            } else {
                html! {
                    { for visible.into_iter().map(|order| {
                        let receipt = order.is_completed().then(|| {
                            let navigate = navigate.clone();
                            let lookup = ReceiptLookup::for_order(&order);
                            Callback::from(move |_: MouseEvent| navigate.emit(Route::Receipt(lookup.clone())))
                        });
                        html! {
                            <tr key={order.payment_reference.clone()} class="text-sm hover:bg-muted/40">
                                <td class="px-6 py-4 text-muted-foreground">{ date_time(order.created_at) }</td>
                                <td class="px-6 py-4 text-foreground">{ order.display_title().to_string() }</td>
                                <td class="px-6 py-4 font-mono text-xs">{ order.payment_reference.clone() }</td>
                                <td class="px-6 py-4"><StatusBadge status={order.status} /></td>
                                <td class="px-6 py-4 text-right font-semibold">{ naira(order.total_amount) }</td>
                                <td class="px-6 py-4 text-right">
                                    if let Some(onclick) = receipt {
                                        <button class="text-[#16a34a] text-xs font-bold" onclick={onclick}>{"View Receipt"}</button>
                                    }
                                </td>
                            </tr>
                        }
                    }) }
                }
            }
        }
    };

    page_shell(
        "Payment History",
        html! {},
        html! {
            <>
                { error_banner(&error) }
                <div class="flex flex-col md:flex-row gap-3">
                    <SearchBar value={(*search).clone()} placeholder="Search by payment or reference" on_input={on_search} />
                    <select class={classes!(INPUT_CLASS, "md:w-48")} onchange={on_select(&status)}>
                        <option value="all" selected={*status == "all"}>{"All statuses"}</option>
                        <option value="completed" selected={*status == "completed"}>{"Completed"}</option>
                        <option value="pending" selected={*status == "pending"}>{"Pending"}</option>
                        <option value="failed" selected={*status == "failed"}>{"Failed"}</option>
                    </select>
                </div>
                <div class="bg-white rounded-[10px] shadow-sm border border-border overflow-x-auto">
                    <table class="w-full text-left border-collapse">
                        <thead>
                            <tr class="bg-muted text-muted-foreground text-[10px] uppercase tracking-widest">
                                <th class="px-6 py-4 font-bold">{"Date"}</th>
                                <th class="px-6 py-4 font-bold">{"Payment"}</th>
                                <th class="px-6 py-4 font-bold">{"Reference"}</th>
                                <th class="px-6 py-4 font-bold">{"Status"}</th>
                                <th class="px-6 py-4 font-bold text-right">{"Amount"}</th>
                                <th class="px-6 py-4"></th>
                            </tr>
                        </thead>
                        <tbody class="divide-y divide-border">
                            { rows }
                        </tbody>
                    </table>
                </div>
            </>
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn order(title: &str, reference: &str, status: OrderStatus, day: u32) -> Order {
        Order {
            id: reference.to_lowercase(),
            student_id: None,
            category_id: None,
            category_title: Some(title.into()),
            original_amount: 1000.0,
            gateway_fee: 15.0,
            total_amount: 1015.0,
            status,
            payment_reference: reference.into(),
            transaction_reference: None,
            created_at: Some(Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()),
            paid_at: None,
            student_name: None,
            student_matric: None,
        }
    }

    fn orders() -> Vec<Order> {
        vec![
            order("NACOS Dues", "NACOS-TXN-1", OrderStatus::Completed, 1),
            order("Lab Levy", "NACOS-TXN-2", OrderStatus::Failed, 2),
            order("Dinner", "NACOS-TXN-3", OrderStatus::Pending, 3),
        ]
    }

    #[test]
    fn test_search_matches_title_and_reference() {
        let by_title = filter_orders(&orders(), "lab", None);
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].payment_reference, "NACOS-TXN-2");

        let by_ref = filter_orders(&orders(), "txn-3", None);
        assert_eq!(by_ref[0].display_title(), "Dinner");
    }

    #[test]
    fn test_status_filter_and_order() {
        assert_eq!(filter_orders(&orders(), "", Some(OrderStatus::Completed)).len(), 1);
        let all = filter_orders(&orders(), "  ", None);
        assert_eq!(all[0].payment_reference, "NACOS-TXN-3");
        assert_eq!(all[2].payment_reference, "NACOS-TXN-1");
    }

    #[test]
    fn test_status_filter_parsing() {
        assert_eq!(parse_status_filter("all"), None);
        assert_eq!(parse_status_filter("completed"), Some(OrderStatus::Completed));
    }
}
