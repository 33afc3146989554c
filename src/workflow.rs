//! Student payment flow.
//!
//! `select → details → (checkout redirect) → verifying → success | pending | failed`
//!
//! The category list is owned by an epoch: every entry into `select` bumps
//! it, the page re-fetches, and answers tagged with an older epoch are
//! dropped. A stale list from before a payment can never be shown.

use std::collections::HashSet;
use std::rc::Rc;

use yew::prelude::*;

use crate::format::estimate_gateway_fee;
use crate::models::{Order, OrderStatus, PaymentCategory};

/// Active categories the student has not completed a payment for yet.
pub fn payable_categories(categories: &[PaymentCategory], orders: &[Order]) -> Vec<PaymentCategory> {
    let paid: HashSet<&str> = orders
        .iter()
        .filter(|o| o.is_completed())
        .filter_map(|o| o.category_id.as_deref())
        .collect();
    categories
        .iter()
        .filter(|c| c.is_active && !paid.contains(c.id.as_str()))
        .cloned()
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub enum Catalog {
    Loading,
    Ready(Vec<PaymentCategory>),
    Failed(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Quote {
    pub amount: f64,
    pub estimated_fee: f64,
}

impl Quote {
    pub fn for_category(category: &PaymentCategory) -> Self {
        Self {
            amount: category.amount,
            estimated_fee: estimate_gateway_fee(category.amount),
        }
    }

    pub fn estimated_total(&self) -> f64 {
        self.amount + self.estimated_fee
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    Select,
    Details {
        category: PaymentCategory,
        quote: Quote,
    },
    /// Order requested; waiting to leave for the checkout page.
    Redirecting { category: PaymentCategory },
    Verifying { reference: String },
    Success { order: Order },
    Pending { reference: String, order: Order },
    Failed {
        category: Option<PaymentCategory>,
        reference: Option<String>,
        message: String,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct PaymentFlow {
    pub step: Step,
    pub catalog: Catalog,
    pub epoch: u32,
}

impl Default for PaymentFlow {
    fn default() -> Self {
        Self {
            step: Step::Select,
            catalog: Catalog::Loading,
            epoch: 0,
        }
    }
}

impl PaymentFlow {
    /// Starts in `verifying` when the checkout sent the student back with
    /// a reference.
    pub fn starting_at(reference: Option<String>) -> Self {
        match reference {
            Some(reference) => Self {
                step: Step::Verifying { reference },
                ..Self::default()
            },
            None => Self::default(),
        }
    }

    fn enter_select(&self) -> Self {
        Self {
            step: Step::Select,
            catalog: Catalog::Loading,
            epoch: self.epoch.wrapping_add(1),
        }
    }

    fn with_step(&self, step: Step) -> Self {
        Self {
            step,
            catalog: self.catalog.clone(),
            epoch: self.epoch,
        }
    }

    /// What the category fetch is keyed on: a new epoch or entering
    /// `select` triggers it.
    pub fn catalog_key(&self) -> (u32, bool) {
        (self.epoch, matches!(self.step, Step::Select))
    }

    pub fn verifying_reference(&self) -> Option<&str> {
        match &self.step {
            Step::Verifying { reference } => Some(reference),
            _ => None,
        }
    }
}

pub enum FlowAction {
    /// Back to `select` with a fresh category fetch: "new payment", cancel,
    /// retry after a failed list load.
    Restart,
    CatalogLoaded {
        epoch: u32,
        categories: Vec<PaymentCategory>,
    },
    CatalogFailed {
        epoch: u32,
        message: String,
    },
    Choose(PaymentCategory),
    Confirm,
    CheckoutFailed(String),
    Verify(String),
    Verified(Order),
    VerifyFailed(String),
    Retry,
}

impl Reducible for PaymentFlow {
    type Action = FlowAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let next = match (action, &self.step) {
            (FlowAction::Restart, _) => Some(self.enter_select()),

            (FlowAction::CatalogLoaded { epoch, categories }, Step::Select)
                if epoch == self.epoch =>
            {
                Some(Self {
                    catalog: Catalog::Ready(categories),
                    ..(*self).clone()
                })
            }
            (FlowAction::CatalogFailed { epoch, message }, Step::Select)
                if epoch == self.epoch =>
            {
                Some(Self {
                    catalog: Catalog::Failed(message),
                    ..(*self).clone()
                })
            }

            (FlowAction::Choose(category), Step::Select) => {
                let quote = Quote::for_category(&category);
                Some(self.with_step(Step::Details { category, quote }))
            }

            (FlowAction::Confirm, Step::Details { category, .. }) => {
                Some(self.with_step(Step::Redirecting {
                    category: category.clone(),
                }))
            }
            (FlowAction::CheckoutFailed(message), Step::Redirecting { category }) => {
                Some(self.with_step(Step::Failed {
                    category: Some(category.clone()),
                    reference: None,
                    message,
                }))
            }

            (FlowAction::Verify(reference), _) => {
                Some(self.with_step(Step::Verifying { reference }))
            }
            (FlowAction::Verified(order), Step::Verifying { reference }) => {
                let reference = reference.clone();
                Some(match order.status {
                    OrderStatus::Completed => self.with_step(Step::Success { order }),
                    OrderStatus::Pending => self.with_step(Step::Pending { reference, order }),
                    OrderStatus::Failed => self.with_step(Step::Failed {
                        category: category_of(&order),
                        reference: Some(reference),
                        message: "Payment was not completed".to_string(),
                    }),
                })
            }
            (FlowAction::VerifyFailed(message), Step::Verifying { reference }) => {
                Some(self.with_step(Step::Failed {
                    category: None,
                    reference: Some(reference.clone()),
                    message,
                }))
            }

            (FlowAction::Retry, Step::Failed { category, reference, .. }) => {
                Some(match (category, reference) {
                    (Some(category), _) => self.with_step(Step::Details {
                        quote: Quote::for_category(category),
                        category: category.clone(),
                    }),
                    (None, Some(reference)) => self.with_step(Step::Verifying {
                        reference: reference.clone(),
                    }),
                    (None, None) => self.enter_select(),
                })
            }

            // anything else is a stale or out-of-place event
            _ => None,
        };
        match next {
            Some(next) => Rc::new(next),
            None => self,
        }
    }
}

/// A failed order echoes its category back; enough to offer a retry.
fn category_of(order: &Order) -> Option<PaymentCategory> {
    let id = order.category_id.clone()?;
    Some(PaymentCategory {
        id,
        title: order.category_title.clone().unwrap_or_default(),
        description: String::new(),
        amount: order.original_amount,
        deadline: None,
        is_active: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: &str, title: &str, amount: f64) -> PaymentCategory {
        PaymentCategory {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            amount,
            deadline: None,
            is_active: true,
        }
    }

    fn order(category_id: &str, status: OrderStatus) -> Order {
        Order {
            id: "o1".into(),
            student_id: Some("u1".into()),
            category_id: Some(category_id.into()),
            category_title: Some("NACOS Dues".into()),
            original_amount: 2000.0,
            gateway_fee: 50.0,
            total_amount: 2050.0,
            status,
            payment_reference: "NACOS-TXN-001234".into(),
            transaction_reference: None,
            created_at: None,
            paid_at: None,
            student_name: None,
            student_matric: None,
        }
    }

    fn apply(flow: PaymentFlow, actions: Vec<FlowAction>) -> PaymentFlow {
        let mut state = Rc::new(flow);
        for action in actions {
            state = state.reduce(action);
        }
        (*state).clone()
    }

    #[test]
    fn test_paid_categories_are_hidden() {
        let mut inactive = category("c3", "Old Levy", 500.0);
        inactive.is_active = false;
        let categories = vec![
            category("c1", "NACOS Dues", 2000.0),
            category("c2", "Dinner Levy", 5000.0),
            inactive,
        ];
        let orders = vec![
            order("c1", OrderStatus::Completed),
            order("c2", OrderStatus::Failed),
        ];
        let payable = payable_categories(&categories, &orders);
        let ids: Vec<&str> = payable.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c2"]);
    }

    #[test]
    fn test_restart_bumps_epoch_and_clears_catalog() {
        let flow = apply(
            PaymentFlow::default(),
            vec![FlowAction::CatalogLoaded {
                epoch: 0,
                categories: vec![category("c1", "NACOS Dues", 2000.0)],
            }],
        );
        assert!(matches!(flow.catalog, Catalog::Ready(_)));
        let flow = apply(flow, vec![FlowAction::Restart]);
        assert_eq!(flow.epoch, 1);
        assert_eq!(flow.catalog, Catalog::Loading);
        assert_eq!(flow.step, Step::Select);
    }

    #[test]
    fn test_stale_catalog_is_ignored() {
        let flow = apply(
            PaymentFlow::default(),
            vec![
                FlowAction::Restart,
                FlowAction::CatalogLoaded {
                    epoch: 0,
                    categories: vec![category("c1", "NACOS Dues", 2000.0)],
                },
            ],
        );
        assert_eq!(flow.catalog, Catalog::Loading);
    }

    #[test]
    fn test_catalog_failure_stays_in_select() {
        let flow = apply(
            PaymentFlow::default(),
            vec![FlowAction::CatalogFailed {
                epoch: 0,
                message: "offline".into(),
            }],
        );
        assert_eq!(flow.step, Step::Select);
        assert_eq!(flow.catalog, Catalog::Failed("offline".into()));
    }

    #[test]
    fn test_catalog_key_changes_on_reentry() {
        let start = PaymentFlow::default();
        assert_eq!(start.catalog_key(), (0, true));
        let details = apply(
            start.clone(),
            vec![FlowAction::Choose(category("c1", "NACOS Dues", 2000.0))],
        );
        assert_eq!(details.catalog_key(), (0, false));
        let back = apply(details, vec![FlowAction::Restart]);
        assert_eq!(back.catalog_key(), (1, true));
        assert_ne!(back.catalog_key(), start.catalog_key());
    }

    #[test]
    fn test_details_carries_estimate_only() {
        let flow = apply(
            PaymentFlow::default(),
            vec![FlowAction::Choose(category("c1", "NACOS Dues", 2000.0))],
        );
        match flow.step {
            Step::Details { quote, .. } => {
                assert_eq!(quote.amount, 2000.0);
                assert_eq!(quote.estimated_fee, 30.0);
                assert_eq!(quote.estimated_total(), 2030.0);
            }
            other => panic!("unexpected step {other:?}"),
        }
    }

    #[test]
    fn test_completed_verification_shows_server_amounts() {
        let flow = apply(
            PaymentFlow::starting_at(Some("NACOS-TXN-001234".into())),
            vec![FlowAction::Verified(order("c1", OrderStatus::Completed))],
        );
        match flow.step {
            Step::Success { order } => {
                assert_eq!(order.total_amount, 2050.0);
                assert_eq!(order.gateway_fee, 50.0);
                assert_eq!(order.payment_reference, "NACOS-TXN-001234");
                assert!(order.reconciles());
            }
            other => panic!("unexpected step {other:?}"),
        }
    }

    #[test]
    fn test_pending_is_not_failure() {
        let flow = apply(
            PaymentFlow::starting_at(Some("NACOS-TXN-001234".into())),
            vec![FlowAction::Verified(order("c1", OrderStatus::Pending))],
        );
        assert!(matches!(flow.step, Step::Pending { .. }));
    }

    #[test]
    fn test_failed_order_retry_returns_to_details() {
        let flow = apply(
            PaymentFlow::starting_at(Some("NACOS-TXN-001234".into())),
            vec![
                FlowAction::Verified(order("c1", OrderStatus::Failed)),
                FlowAction::Retry,
            ],
        );
        match flow.step {
            Step::Details { category, .. } => assert_eq!(category.id, "c1"),
            other => panic!("unexpected step {other:?}"),
        }
    }

    #[test]
    fn test_request_failure_retry_reverifies() {
        let flow = apply(
            PaymentFlow::starting_at(Some("NACOS-TXN-001234".into())),
            vec![
                FlowAction::VerifyFailed("Network".into()),
                FlowAction::Retry,
            ],
        );
        assert_eq!(flow.verifying_reference(), Some("NACOS-TXN-001234"));
    }

    #[test]
    fn test_checkout_failure_keeps_category() {
        let flow = apply(
            PaymentFlow::default(),
            vec![
                FlowAction::Choose(category("c2", "Dinner Levy", 5000.0)),
                FlowAction::Confirm,
                FlowAction::CheckoutFailed("Rejected".into()),
            ],
        );
        match &flow.step {
            Step::Failed { category, .. } => {
                assert_eq!(category.as_ref().map(|c| c.id.as_str()), Some("c2"))
            }
            other => panic!("unexpected step {other:?}"),
        }
        let flow = apply(flow, vec![FlowAction::Restart]);
        assert_eq!(flow.step, Step::Select);
        assert_eq!(flow.catalog, Catalog::Loading);
    }

    #[test]
    fn test_late_verification_result_is_ignored() {
        let flow = apply(
            PaymentFlow::starting_at(Some("NACOS-TXN-001234".into())),
            vec![
                FlowAction::Restart,
                FlowAction::Verified(order("c1", OrderStatus::Completed)),
            ],
        );
        assert_eq!(flow.step, Step::Select);
    }
}
