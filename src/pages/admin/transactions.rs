use yew::prelude::*;

use crate::api::wire::OrderPayload;
use crate::format::{date_time, naira};
use crate::listing::{use_list_query, use_paged_list, QueryAction};
use crate::pages::ReceiptLookup;
use crate::ui::{page_shell, table_error, table_message, Pager, SearchBar, StatusBadge, INPUT_CLASS};
use crate::{use_navigate, Route};

const STATUSES: [(&str, &str); 4] = [
    ("all", "All statuses"),
    ("completed", "Completed"),
    ("pending", "Pending"),
    ("failed", "Failed"),
];

#[function_component(AdminTransactionsPage)]
pub fn admin_transactions_page() -> Html {
    let (query, search) = use_list_query("status");
    let list = use_paged_list::<OrderPayload>("/orders/admin/transactions", (*query).clone());
    let navigate = use_navigate();

    let on_search = {
        let search = search.clone();
        Callback::from(move |value: String| search.set(value))
    };
    let on_status = {
        let query = query.clone();
        Callback::from(move |e: Event| {
            let select: web_sys::HtmlSelectElement = e.target_unchecked_into();
            let value = select.value();
            query.dispatch(QueryAction::Filter((value != "all").then_some(value)));
        })
    };
    let on_retry = {
        let query = query.clone();
        Callback::from(move |_: ()| query.dispatch(QueryAction::Reload))
    };
    let on_page = {
        let query = query.clone();
        Callback::from(move |page: u32| query.dispatch(QueryAction::Page(page)))
    };

    let selected = query.filter.clone().unwrap_or_else(|| "all".to_string());

    let rows = match (&list.page, &list.error) {
        (_, Some(message)) => table_error(7, message, on_retry),
        (None, None) => table_message(7, "Loading..."),
        (Some(page), None) if page.items.is_empty() => table_message(7, "No transactions found."),
        (Some(page), None) => html! {
            { for page.items.iter().map(|order| {
                let receipt = order.is_completed().then(|| {
                    let navigate = navigate.clone();
                    let lookup = ReceiptLookup::for_order(order);
                    Callback::from(move |_: MouseEvent| navigate.emit(Route::Receipt(lookup.clone())))
                });
                html! {
                    <tr key={order.payment_reference.clone()} class="text-sm hover:bg-muted/40">
                        <td class="px-6 py-4">
                            <p class="text-foreground font-medium">{ order.student_name.clone().unwrap_or_else(|| "—".to_string()) }</p>
                            <p class="text-xs text-muted-foreground">{ order.student_matric.clone().unwrap_or_default() }</p>
                        </td>
                        <td class="px-6 py-4 text-foreground">{ order.display_title().to_string() }</td>
                        <td class="px-6 py-4 font-mono text-xs">{ order.payment_reference.clone() }</td>
                        <td class="px-6 py-4 text-muted-foreground">{ date_time(order.paid_at.or(order.created_at)) }</td>
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
        },
    };

    page_shell(
        "Transactions",
        html! {},
        html! {
            <>
                <div class="flex flex-col md:flex-row gap-3">
                    <SearchBar value={(*search).clone()} placeholder="Search by name, matric number or reference" on_input={on_search} />
                    <select class={classes!(INPUT_CLASS, "md:w-48")} onchange={on_status}>
                        { for STATUSES.iter().map(|(value, label)| html! {
                            <option value={*value} selected={selected == *value}>{ *label }</option>
                        }) }
                    </select>
                </div>
                <div class="bg-white rounded-[10px] shadow-sm border border-border overflow-hidden">
                    <div class="overflow-x-auto">
                        <table class="w-full text-left border-collapse">
                            <thead>
                                <tr class="bg-muted text-muted-foreground text-[10px] uppercase tracking-widest">
                                    <th class="px-6 py-4 font-bold">{"Student"}</th>
                                    <th class="px-6 py-4 font-bold">{"Payment"}</th>
                                    <th class="px-6 py-4 font-bold">{"Reference"}</th>
                                    <th class="px-6 py-4 font-bold">{"Date"}</th>
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
                    if let Some(page) = &list.page {
                        <Pager pagination={page.pagination.clone()} on_page={on_page} />
                    }
                </div>
            </>
        },
    )
}
