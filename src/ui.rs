//! Small building blocks shared by the pages.

use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::icons::{icon_alert, icon_arrow_up_right, icon_check_circle, icon_clock, icon_search, icon_wallet};
use crate::models::{OrderStatus, Pagination};

pub const INPUT_CLASS: &str = "w-full bg-[#f1f4f9] rounded-[10px] px-3 py-2 text-sm text-[#14532d] border-none focus:ring-2 focus:ring-[#16a34a] outline-none";
pub const PRIMARY_BUTTON: &str = "bg-[#14532d] text-white px-4 py-2 rounded-[10px] text-sm font-bold hover:opacity-90 transition-opacity disabled:opacity-50";
pub const SECONDARY_BUTTON: &str = "bg-[#dcfce7] text-[#14532d] px-4 py-2 rounded-[10px] text-sm font-bold hover:opacity-90 transition-opacity disabled:opacity-50";

pub fn page_shell(title: &'static str, actions: Html, children: Html) -> Html {
    html! {
        <div class="p-6 max-w-7xl mx-auto">
            <div class="flex items-center justify-between pb-4 border-b border-border">
                <h1 class="text-2xl font-bold text-foreground">{ title }</h1>
                { actions }
            </div>
            <div class="pt-5 space-y-6">
                { children }
            </div>
        </div>
    }
}

pub fn on_text(state: &UseStateHandle<String>) -> Callback<InputEvent> {
    let state = state.clone();
    Callback::from(move |e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        state.set(input.value());
    })
}

pub fn on_select(state: &UseStateHandle<String>) -> Callback<Event> {
    let state = state.clone();
    Callback::from(move |e: Event| {
        let input: HtmlSelectElement = e.target_unchecked_into();
        state.set(input.value());
    })
}

pub fn error_banner(message: &Option<String>) -> Html {
    match message {
        Some(msg) => html! {
            <div class="text-sm text-red-600 bg-red-50 border border-red-200 rounded-lg px-4 py-3">{ msg.clone() }</div>
        },
        None => html! {},
    }
}

#[derive(Clone, Copy, PartialEq)]
pub enum StatIcon {
    UpRight,
    Wallet,
    Check,
    Clock,
    Alert,
}

#[derive(Properties, PartialEq)]
pub struct StatCardProps {
    pub title: &'static str,
    pub value: String,
    pub icon: StatIcon,
}

#[function_component(StatCard)]
pub fn stat_card(props: &StatCardProps) -> Html {
    html! {
        <div class="bg-card p-6 rounded-[10px] shadow-sm border border-border flex justify-between items-start">
            <div>
                <p class="text-muted-foreground text-[10px] font-bold mb-1 tracking-widest uppercase">{ props.title }</p>
                <h3 class="text-2xl font-bold text-[#14532d] tracking-tight">{ props.value.clone() }</h3>
            </div>
            <div class="p-3 bg-[#f0fdf4] rounded-[10px]">
                {
                    match props.icon {
                        StatIcon::UpRight => icon_arrow_up_right(),
                        StatIcon::Wallet => icon_wallet(),
                        StatIcon::Check => icon_check_circle(),
                        StatIcon::Clock => icon_clock(),
                        StatIcon::Alert => icon_alert(),
                    }
                }
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct StatusBadgeProps {
    pub status: OrderStatus,
}

#[function_component(StatusBadge)]
pub fn status_badge(props: &StatusBadgeProps) -> Html {
    let class_name = match props.status {
        OrderStatus::Completed => "bg-green-100 text-green-700",
        OrderStatus::Pending => "bg-amber-100 text-amber-700",
        OrderStatus::Failed => "bg-red-100 text-red-700",
    };
    html! {
        <span class={classes!("px-2.5", "py-1", "rounded-md", "text-[10px]", "font-bold", class_name)}>
            { props.status.label() }
        </span>
    }
}

#[derive(Properties, PartialEq)]
pub struct SearchBarProps {
    pub value: String,
    pub placeholder: &'static str,
    pub on_input: Callback<String>,
}

#[function_component(SearchBar)]
pub fn search_bar(props: &SearchBarProps) -> Html {
    let on_input = {
        let on_input = props.on_input.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            on_input.emit(input.value());
        })
    };
    html! {
        <div class="relative flex-1">
            <span class="absolute left-3 top-2.5 text-slate-400">{ icon_search() }</span>
            <input
                type="search"
                class={classes!(INPUT_CLASS, "pl-10")}
                placeholder={props.placeholder}
                value={props.value.clone()}
                oninput={on_input}
            />
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct PagerProps {
    pub pagination: Pagination,
    pub on_page: Callback<u32>,
}

#[function_component(Pager)]
pub fn pager(props: &PagerProps) -> Html {
    let p = &props.pagination;
    let prev = {
        let on_page = props.on_page.clone();
        let page = p.page.saturating_sub(1).max(1);
        Callback::from(move |_| on_page.emit(page))
    };
    let next = {
        let on_page = props.on_page.clone();
        let page = p.page + 1;
        Callback::from(move |_| on_page.emit(page))
    };
    html! {
        <div class="flex items-center justify-between px-6 py-4 border-t border-border text-sm text-muted-foreground">
            <span>{ format!("Showing {}-{} of {}", p.first_row(), p.last_row(), p.total) }</span>
            <div class="flex items-center gap-2">
                <button class={SECONDARY_BUTTON} disabled={!p.has_previous} onclick={prev}>{"Previous"}</button>
                <span>{ format!("Page {} of {}", p.page, p.total_pages.max(1)) }</span>
                <button class={SECONDARY_BUTTON} disabled={!p.has_next} onclick={next}>{"Next"}</button>
            </div>
        </div>
    }
}

/// Table body placeholder row for loading, error and empty states.
pub fn table_error(colspan: usize, message: &str, on_retry: Callback<()>) -> Html {
    html! {
        <tr>
            <td colspan={colspan.to_string()} class="px-8 py-6 text-center">
                <p class="text-red-600 text-sm mb-3">{ message.to_string() }</p>
                <button class={SECONDARY_BUTTON} onclick={on_retry.reform(|_: MouseEvent| ())}>{"Retry"}</button>
            </td>
        </tr>
    }
}

pub fn table_message(colspan: usize, message: &str) -> Html {
    html! {
        <tr>
            <td colspan={colspan.to_string()} class="px-8 py-6 text-center text-muted-foreground">{ message.to_string() }</td>
        </tr>
    }
}
