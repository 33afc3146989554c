use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::cancel::RequestScope;
use crate::format::naira;
use crate::models::AdminStats;
use crate::session::use_session;
use crate::ui::{error_banner, page_shell, StatCard, StatIcon, SECONDARY_BUTTON};
use crate::{use_navigate, Route};

/// Share of transactions that completed, as a whole percentage.
pub fn success_rate(stats: &AdminStats) -> u32 {
    if stats.total_transactions == 0 {
        return 0;
    }
    ((stats.successful_payments as f64 / stats.total_transactions as f64) * 100.0).round() as u32
}

#[function_component(AdminDashboardPage)]
pub fn admin_dashboard_page() -> Html {
    let stats = use_state(|| None::<AdminStats>);
    let error = use_state(|| None::<String>);
    let session = use_session();
    let navigate = use_navigate();

    {
        let stats = stats.clone();
        let error = error.clone();
        use_effect_with_deps(
            move |_| {
                let scope = RequestScope::new();
                let api = session.api().scoped(&scope);
                let task = scope.clone();
                spawn_local(async move {
                    let result = api.admin_stats().await;
                    if task.is_cancelled() {
                        return;
                    }
                    match result {
                        Ok(data) => stats.set(Some(data)),
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

    let link = |label: &'static str, route: Route| {
        let navigate = navigate.clone();
        html! {
            <button class={SECONDARY_BUTTON} onclick={Callback::from(move |_| navigate.emit(route.clone()))}>
                { label }
            </button>
        }
    };

    let body = match &*stats {
        None if error.is_some() => error_banner(&error),
        None => html! { <p class="text-muted-foreground">{"Loading..."}</p> },
        Some(s) => html! {
            <>
                <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                    <StatCard title="Total Revenue" value={naira(s.total_revenue)} icon={StatIcon::Wallet} />
                    <StatCard title="Transactions" value={s.total_transactions.to_string()} icon={StatIcon::UpRight} />
                    <StatCard title="Registered Students" value={s.students_registered.to_string()} icon={StatIcon::UpRight} />
                </div>
                <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                    <StatCard title="Successful" value={s.successful_payments.to_string()} icon={StatIcon::Check} />
                    <StatCard title="Pending" value={s.pending_payments.to_string()} icon={StatIcon::Clock} />
                    <StatCard title="Failed" value={s.failed_payments.to_string()} icon={StatIcon::Alert} />
                </div>
                <div class="bg-white p-5 rounded-[10px] shadow-sm border border-border">
                    <p class="text-muted-foreground text-[10px] font-bold tracking-widest uppercase mb-2">{"Success Rate"}</p>
                    <div class="w-full h-3 bg-muted rounded-full overflow-hidden">
                        <div class="h-full bg-[#16a34a]" style={format!("width: {}%", success_rate(s))}></div>
                    </div>
                    <p class="text-sm text-foreground mt-2">{ format!("{}% of transactions completed", success_rate(s)) }</p>
                </div>
            </>
        },
    };

    page_shell(
        "Admin Overview",
        html! {
            <div class="flex gap-3">
                { link("Transactions", Route::AdminTransactions) }
                { link("Categories", Route::AdminCategories) }
                { link("Students", Route::AdminStudents) }
            </div>
        },
        body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_rate() {
        let stats = AdminStats {
            total_transactions: 8,
            successful_payments: 6,
            ..AdminStats::default()
        };
        assert_eq!(success_rate(&stats), 75);
        assert_eq!(success_rate(&AdminStats::default()), 0);
    }
}
