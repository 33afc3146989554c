use yew::prelude::*;

use crate::api::wire::UserPayload;
use crate::format::date;
use crate::listing::{use_list_query, use_paged_list, QueryAction};
use crate::ui::{page_shell, table_error, table_message, Pager, SearchBar, INPUT_CLASS};

const LEVELS: [&str; 5] = ["100", "200", "300", "400", "500"];

#[function_component(AdminStudentsPage)]
pub fn admin_students_page() -> Html {
    let (query, search) = use_list_query("level");
    let list = use_paged_list::<UserPayload>("/users/students", (*query).clone());

    let on_search = {
        let search = search.clone();
        Callback::from(move |value: String| search.set(value))
    };
    let on_level = {
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
        (_, Some(message)) => table_error(6, message, on_retry),
        (None, None) => table_message(6, "Loading..."),
        (Some(page), None) if page.items.is_empty() => table_message(6, "No students found."),
        (Some(page), None) => html! {
            { for page.items.iter().map(|student| html! {
                <tr key={student.id.clone()} class="text-sm hover:bg-muted/40">
                    <td class="px-6 py-4 text-foreground font-medium">{ student.full_name.clone() }</td>
                    <td class="px-6 py-4 font-mono text-xs">{ student.matric_number.clone() }</td>
                    <td class="px-6 py-4 text-muted-foreground">{ student.email.clone() }</td>
                    <td class="px-6 py-4 text-foreground">
                        { if student.level.is_empty() { "—".to_string() } else { format!("{} Level", student.level) } }
                    </td>
                    <td class="px-6 py-4 text-muted-foreground">{ student.phone_number.clone() }</td>
                    <td class="px-6 py-4 text-muted-foreground">{ date(student.created_at) }</td>
                </tr>
            }) }
        },
    };

    page_shell(
        "Students",
        html! {},
        html! {
            <>
                <div class="flex flex-col md:flex-row gap-3">
                    <SearchBar value={(*search).clone()} placeholder="Search by name, matric number or email" on_input={on_search} />
                    <select class={classes!(INPUT_CLASS, "md:w-48")} onchange={on_level}>
                        <option value="all" selected={selected == "all"}>{"All levels"}</option>
                        { for LEVELS.iter().map(|level| html! {
                            <option value={*level} selected={selected == *level}>{ format!("{level} Level") }</option>
                        }) }
                    </select>
                </div>
                <div class="bg-white rounded-[10px] shadow-sm border border-border overflow-hidden">
                    <div class="overflow-x-auto">
                        <table class="w-full text-left border-collapse">
                            <thead>
                                <tr class="bg-muted text-muted-foreground text-[10px] uppercase tracking-widest">
                                    <th class="px-6 py-4 font-bold">{"Name"}</th>
                                    <th class="px-6 py-4 font-bold">{"Matric Number"}</th>
                                    <th class="px-6 py-4 font-bold">{"Email"}</th>
                                    <th class="px-6 py-4 font-bold">{"Level"}</th>
                                    <th class="px-6 py-4 font-bold">{"Phone"}</th>
                                    <th class="px-6 py-4 font-bold">{"Joined"}</th>
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
