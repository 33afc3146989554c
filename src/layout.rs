use yew::prelude::*;

use crate::config::config;
use crate::icons::*;
use crate::models::{Role, User};
use crate::session::use_session;
use crate::Route;

struct NavItem {
    label: &'static str,
    route: Route,
    icon: fn() -> Html,
}

fn nav_items(role: Role) -> Vec<NavItem> {
    match role {
        Role::Student => vec![
            NavItem {
                label: "Dashboard",
                route: Route::Dashboard,
                icon: icon_layout_grid,
            },
            NavItem {
                label: "Make Payment",
                route: Route::Payments,
                icon: icon_credit_card,
            },
            NavItem {
                label: "Payment History",
                route: Route::History,
                icon: icon_history,
            },
            NavItem {
                label: "Profile",
                route: Route::Profile,
                icon: icon_user,
            },
        ],
        Role::Admin => vec![
            NavItem {
                label: "Overview",
                route: Route::AdminDashboard,
                icon: icon_bar_chart,
            },
            NavItem {
                label: "Transactions",
                route: Route::AdminTransactions,
                icon: icon_receipt,
            },
            NavItem {
                label: "Payment Categories",
                route: Route::AdminCategories,
                icon: icon_tag,
            },
            NavItem {
                label: "Students",
                route: Route::AdminStudents,
                icon: icon_users,
            },
            NavItem {
                label: "Profile",
                route: Route::Profile,
                icon: icon_user,
            },
        ],
    }
}

#[derive(Properties, PartialEq)]
pub struct LayoutProps {
    pub children: Children,
    pub active: Route,
    pub on_select: Callback<Route>,
    pub on_logout: Callback<()>,
}

#[function_component(Layout)]
pub fn layout(props: &LayoutProps) -> Html {
    let session = use_session();
    let user = session.user();
    let role = user.as_ref().map(|u| u.role).unwrap_or(Role::Student);

    html! {
        <div class="flex h-screen bg-background">
            <div class="hidden md:flex">
                <Sidebar
                    role={role}
                    active={props.active.clone()}
                    on_select={props.on_select.clone()}
                    on_logout={props.on_logout.clone()}
                />
            </div>

            <div class="flex-1 flex flex-col overflow-hidden">
                { header(user.as_deref()) }
                <main class="flex-1 overflow-y-auto">
                    { for props.children.iter() }
                </main>
            </div>
        </div>
    }
}

fn header(user: Option<&User>) -> Html {
    let Some(user) = user else {
        return html! {};
    };
    let subtitle = if user.is_admin() {
        "Administrator".to_string()
    } else if user.level.is_empty() {
        user.matric_number.clone()
    } else {
        format!("{} · {} Level", user.matric_number, user.level)
    };

    html! {
        <header class="bg-[#f0fdf4] border-b border-border h-16 flex items-center justify-between px-6">
            <div class="flex-1"></div>
            <div class="flex items-center gap-3">
                <div class="text-right">
                    <p class="text-sm font-bold text-[#14532d]">{ user.full_name.clone() }</p>
                    <p class="text-[11px] text-slate-500">{ subtitle }</p>
                </div>
                <div class="w-9 h-9 rounded-full bg-[#14532d] text-white flex items-center justify-center text-sm font-bold">
                    { user.first_name().chars().next().map(|c| c.to_uppercase().to_string()).unwrap_or_default() }
                </div>
            </div>
        </header>
    }
}

#[derive(Properties, PartialEq)]
struct SidebarProps {
    role: Role,
    active: Route,
    on_select: Callback<Route>,
    on_logout: Callback<()>,
}

#[function_component(Sidebar)]
fn sidebar(props: &SidebarProps) -> Html {
    let on_logout = {
        let on_logout = props.on_logout.clone();
        Callback::from(move |_| on_logout.emit(()))
    };

    html! {
        <div class="w-[220px] h-screen bg-[#f0fdf4] p-4 flex flex-col">
            <div class="flex items-center gap-3 px-2 mb-8">
                <div class="w-12 h-12 bg-[#14532d] rounded-full flex items-center justify-center">
                    <img src={config().receipt_logo.clone()} alt="NACOS" class="w-full h-full object-cover rounded-full" />
                </div>
                <span class="text-[#14532d] text-2xl font-black tracking-tight">{"NACOS"}</span>
            </div>

            <div class="flex-1 bg-[#14532d] rounded-[24px] flex flex-col py-6 px-3 shadow-lg">
                <nav class="flex-1 space-y-2">
                    { for nav_items(props.role).into_iter().map(|item| {
                        let is_active = item.route.section() == props.active.section();
                        let class_name = if is_active {
                            "flex items-center gap-3 px-4 py-3 rounded-xl transition-all text-[13px] font-medium bg-[#bbf7d0] text-[#14532d] w-full"
                        } else {
                            "flex items-center gap-3 px-4 py-3 rounded-xl transition-all text-[13px] font-medium text-slate-200 hover:bg-white/5 hover:text-white w-full"
                        };
                        let on_select = props.on_select.clone();
                        let route = item.route;

                        html! {
                            <button type="button" class={class_name} onclick={Callback::from(move |_| on_select.emit(route.clone()))}>
                                <span class="shrink-0">{ (item.icon)() }</span>
                                <span class="truncate whitespace-nowrap text-left">{ item.label }</span>
                            </button>
                        }
                    }) }
                </nav>

                <div class="mt-auto pt-4">
                    <button onclick={on_logout} class="flex items-center gap-3 w-full px-4 py-3 rounded-xl hover:bg-white/10 transition-colors text-[13px] font-medium text-slate-200">
                        { icon_log_out() }
                        <span>{"Log Out"}</span>
                    </button>
                </div>
            </div>
        </div>
    }
}
