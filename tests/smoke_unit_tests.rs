//! Smoke Screen Unit tests for offer negotiation components
//!
//! These tests exercise each module in isolation from the integration
//! scenarios. Most cover the happy path, with the rule tables checked
//! exhaustively since every operation depends on them.

use offer_negotiation::{
    Action, HistoryEntry, NegotiationError, Offer, OfferDetails, PrivateData, Role, State,
    config::NegotiationConfig,
    rules::{
        check_action, check_transition, is_action_permitted, is_transition_permitted,
        permitted_actions, permitted_transitions,
    },
    utils::{Bech32IdGenerator, IdGenerator, new_uuid_to_bech32},
};
use std::cell::Cell;

/// Deterministic ids for tests that inspect them
struct CountingIds(Cell<u32>);

impl IdGenerator for CountingIds {
    fn next_id(&self) -> anyhow::Result<String> {
        let next = self.0.get() + 1;
        self.0.set(next);
        Ok(format!("offer-{}", next))
    }
}

struct FailingIds;

impl IdGenerator for FailingIds {
    fn next_id(&self) -> anyhow::Result<String> {
        Err(anyhow::anyhow!("id source exhausted"))
    }
}

fn details() -> OfferDetails {
    OfferDetails::new("Test", 5, 50.0)
}

// UTILS MODULE TESTS
mod utils_tests {
    use super::*;

    #[test]
    fn generates_valid_bech32_with_hrp() {
        let encoded = new_uuid_to_bech32("offer_").unwrap();
        assert!(encoded.starts_with("offer_1"));
        assert!(encoded.len() > 10);
    }

    #[test]
    fn handles_empty_hrp() {
        assert!(new_uuid_to_bech32("").is_err());
        assert!(Bech32IdGenerator::new("").is_err());
    }

    #[test]
    fn generates_unique_ids() {
        let generator = Bech32IdGenerator::new("offer_").unwrap();
        let id1 = generator.next_id().unwrap();
        let id2 = generator.next_id().unwrap();
        let id3 = generator.next_id().unwrap();

        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_ne!(id1, id3);
    }
}

// CONFIG MODULE TESTS
mod config_tests {
    use super::*;
    use offer_negotiation::NegotiationService;

    #[test]
    fn default_prefix_is_valid() {
        let config = NegotiationConfig::default();
        assert_eq!(config.offer_id_prefix, "offer_");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn custom_prefix_is_used_for_offer_ids() {
        let config = NegotiationConfig::new().set_offer_id_prefix("deal");
        let mut service = NegotiationService::with_config(config).unwrap();

        let offer_id = service.submit("123", "456", details()).unwrap();
        assert!(offer_id.starts_with("deal1"));
    }

    #[test]
    fn invalid_prefix_is_rejected() {
        let config = NegotiationConfig::new().set_offer_id_prefix("");
        assert!(config.validate().is_err());
        assert!(NegotiationService::with_config(config).is_err());
    }
}

// RULES MODULE TESTS
mod rules_tests {
    use super::*;

    /// Destination each negotiating action leads to for a role
    fn destination(action: Action, role: Role) -> Option<State> {
        match action {
            Action::Accept => Some(State::Accepted),
            Action::Cancel => Some(State::Cancelled),
            Action::ProposeUpdate => Some(role.proposal_target()),
            Action::Withdraw => Some(role.withdrawal_target()),
            Action::Submit | Action::UpdatePrivateData => None,
        }
    }

    #[test]
    fn buyer_and_seller_tables_differ() {
        assert_eq!(
            permitted_actions(State::AwaitingSellerAcceptance, Role::Buyer),
            &[Action::Withdraw, Action::Cancel, Action::UpdatePrivateData]
        );
        assert_eq!(
            permitted_actions(State::AwaitingSellerAcceptance, Role::Seller),
            &[
                Action::Accept,
                Action::Cancel,
                Action::ProposeUpdate,
                Action::UpdatePrivateData
            ]
        );
    }

    #[test]
    fn private_data_is_permitted_everywhere() {
        for state in State::ALL {
            for role in [Role::Buyer, Role::Seller] {
                assert!(is_action_permitted(state, Action::UpdatePrivateData, role));
            }
        }
    }

    #[test]
    fn submit_is_never_a_transition_action() {
        for state in State::ALL {
            for role in [Role::Buyer, Role::Seller] {
                assert!(!is_action_permitted(state, Action::Submit, role));
            }
        }
    }

    #[test]
    fn terminal_states_have_no_transitions() {
        for state in [State::Accepted, State::Cancelled] {
            for role in [Role::Buyer, Role::Seller] {
                assert!(permitted_transitions(state, role).is_empty());
                assert_eq!(permitted_actions(state, role), &[Action::UpdatePrivateData]);
            }
        }
    }

    /// Every action the service maps to a destination is either allowed by both
    /// tables or by neither, so the transition check is never dead code
    #[test]
    fn tables_are_jointly_satisfiable() {
        for state in State::ALL {
            for role in [Role::Buyer, Role::Seller] {
                for action in Action::ALL {
                    if let Some(next) = destination(action, role) {
                        assert_eq!(
                            is_action_permitted(state, action, role),
                            is_transition_permitted(state, next, role),
                            "{} by {} from {}",
                            action,
                            role,
                            state
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn every_allowed_destination_is_reachable_by_some_action() {
        for state in State::ALL {
            for role in [Role::Buyer, Role::Seller] {
                for next in permitted_transitions(state, role) {
                    let reachable = permitted_actions(state, role)
                        .iter()
                        .any(|action| destination(*action, role) == Some(*next));
                    assert!(reachable, "{} -> {} for {}", state, next, role);
                }
            }
        }
    }

    #[test]
    fn check_functions_report_the_failing_table() {
        assert_eq!(
            check_action(State::WithdrawnByBuyer, Action::Accept, Role::Buyer),
            Err(NegotiationError::ActionNotPermitted {
                action: Action::Accept,
                state: State::WithdrawnByBuyer,
            })
        );
        assert_eq!(
            check_transition(State::AwaitingSellerAcceptance, State::Accepted, Role::Buyer),
            Err(NegotiationError::IllegalStateTransition {
                from: State::AwaitingSellerAcceptance,
                to: State::Accepted,
            })
        );
        assert!(check_action(State::AwaitingSellerAcceptance, Action::Accept, Role::Seller).is_ok());
        assert!(
            check_transition(State::AwaitingSellerAcceptance, State::Accepted, Role::Seller)
                .is_ok()
        );
    }
}

// DETAILS MODULE TESTS
mod details_tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let details = OfferDetails::default()
            .set_product_name("Widget")
            .set_quantity(4)
            .set_price(2.5);

        assert_eq!(details.product_name(), "Widget");
        assert_eq!(details.quantity(), 4);
        assert_eq!(details.price(), 2.5);
        assert_eq!(details.total_price(), 10.0);
        assert!(details.validate().is_ok());
    }

    #[test]
    fn rejects_bad_details() {
        for bad in [
            OfferDetails::new("", 1, 1.0),
            OfferDetails::new("   ", 1, 1.0),
            OfferDetails::new("Test", -1, 1.0),
            OfferDetails::new("Test", 1, -0.5),
            OfferDetails::new("Test", 1, f64::INFINITY),
        ] {
            assert!(matches!(
                bad.validate(),
                Err(NegotiationError::InvalidOfferDetails(_))
            ));
        }
    }
}

// OFFER MODULE TESTS
mod offer_tests {
    use super::*;

    fn new_offer() -> Offer {
        Offer::create(&CountingIds(Cell::new(0)), "123", "456", details()).unwrap()
    }

    #[test]
    fn create_seeds_submit_entry() {
        let offer = new_offer();

        assert_eq!(offer.id(), "offer-1");
        assert_eq!(offer.buyer_id(), "123");
        assert_eq!(offer.seller_id(), "456");
        assert_eq!(offer.current_state(), State::AwaitingSellerAcceptance);
        assert_eq!(offer.version(), 1);

        let first = offer.latest();
        assert_eq!(first.action, Action::Submit);
        assert_eq!(first.actor_id, "123");
        assert!(first.private_data.is_empty());
    }

    #[test]
    fn create_rejects_invalid_details_before_drawing_an_id() {
        let ids = CountingIds(Cell::new(0));
        let res = Offer::create(&ids, "123", "456", OfferDetails::new("Test", -15, 150.0));

        assert!(matches!(res, Err(NegotiationError::InvalidOfferDetails(_))));
        assert_eq!(ids.0.get(), 0);
    }

    #[test]
    fn create_surfaces_id_failures() {
        let res = Offer::create(&FailingIds, "123", "456", details());
        assert!(matches!(res, Err(NegotiationError::IdGeneration(_))));
    }

    #[test]
    fn roles_resolve_from_buyer_id() {
        let offer = new_offer();
        assert!(offer.is_buyer("123"));
        assert_eq!(offer.role_of("123"), Role::Buyer);
        assert_eq!(offer.role_of("456"), Role::Seller);
    }

    #[test]
    fn action_check_runs_before_transition_check() {
        let mut offer = new_offer();

        // the buyer may move to Cancelled, but not by accepting
        let res = offer.transition(
            State::Cancelled,
            Action::Accept,
            "123",
            details(),
            Role::Buyer,
        );
        assert_eq!(
            res,
            Err(NegotiationError::ActionNotPermitted {
                action: Action::Accept,
                state: State::AwaitingSellerAcceptance,
            })
        );

        // a permitted action aimed at the wrong destination
        let res = offer.transition(
            State::Accepted,
            Action::Cancel,
            "123",
            details(),
            Role::Buyer,
        );
        assert_eq!(
            res,
            Err(NegotiationError::IllegalStateTransition {
                from: State::AwaitingSellerAcceptance,
                to: State::Accepted,
            })
        );
        assert_eq!(offer.version(), 1);
    }

    #[test]
    fn transition_carries_private_data_forward() {
        let mut offer = new_offer();

        let mut data = PrivateData::new();
        data.insert("note".into(), "ask for discount".into());
        offer.update_private_data("123", data.clone());

        offer
            .transition(
                State::AwaitingBuyerAcceptance,
                Action::ProposeUpdate,
                "456",
                OfferDetails::new("Test", 5, 45.0),
                Role::Seller,
            )
            .unwrap();

        let latest = offer.latest();
        assert_eq!(offer.version(), 3);
        assert_eq!(latest.private_data, data);
        assert_eq!(latest.offer_details.price(), 45.0);
        assert_eq!(latest.actor_id, "456");
    }

    #[test]
    fn export_history_decodes_back() {
        let mut offer = new_offer();
        offer
            .transition(
                State::Accepted,
                Action::Accept,
                "456",
                details(),
                Role::Seller,
            )
            .unwrap();

        let exported = offer.export_history().unwrap();
        assert_eq!(exported.len(), 2);

        for ((hash, cbor), original) in exported.iter().zip(offer.history()) {
            let decoded: HistoryEntry = minicbor::decode(cbor).unwrap();
            assert_eq!(&decoded, original);
            assert_eq!(hash, &original.build().unwrap().0);
        }
        assert_ne!(exported[0].0, exported[1].0);
    }
}
