use crate::booking::BookingStatus;

#[derive(Debug, thiserror::Error)]
#[error("invalid status transition from {from} to {to}")]
pub struct TransitionError {
    pub from: &'static str,
    pub to: &'static str,
}

/// Targets reachable from `status`. Terminal states map to an empty
/// slice.
pub fn allowed_targets(status: BookingStatus) -> &'static [BookingStatus] {
    match status {
        BookingStatus::Pending => &[BookingStatus::Confirmed, BookingStatus::Cancelled],
        BookingStatus::Confirmed => &[BookingStatus::Completed, BookingStatus::Cancelled],
        BookingStatus::Cancelled => &[],
        BookingStatus::Completed => &[],
    }
}

/// Validate a requested status change against the lifecycle table.
/// Applied on status-only partial updates; full-record updates bypass
/// this check (see the booking service).
pub fn validate_transition(
    current: BookingStatus,
    requested: BookingStatus,
) -> Result<(), TransitionError> {
    if allowed_targets(current).contains(&requested) {
        Ok(())
    } else {
        Err(TransitionError {
            from: current.as_str(),
            to: requested.as_str(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::BookingStatus::*;

    #[test]
    fn the_four_valid_edges_pass() {
        assert!(validate_transition(Pending, Confirmed).is_ok());
        assert!(validate_transition(Pending, Cancelled).is_ok());
        assert!(validate_transition(Confirmed, Completed).is_ok());
        assert!(validate_transition(Confirmed, Cancelled).is_ok());
    }

    #[test]
    fn every_other_pair_is_rejected() {
        let valid = [
            (Pending, Confirmed),
            (Pending, Cancelled),
            (Confirmed, Completed),
            (Confirmed, Cancelled),
        ];

        for from in BookingStatus::ALL {
            for to in BookingStatus::ALL {
                if valid.contains(&(from, to)) {
                    continue;
                }
                let err = validate_transition(from, to)
                    .expect_err("transition should have been rejected");
                let msg = err.to_string();
                assert!(msg.contains(from.as_str()), "missing current state: {msg}");
                assert!(msg.contains(to.as_str()), "missing target state: {msg}");
            }
        }
    }

    #[test]
    fn terminal_states_have_no_exits() {
        assert!(allowed_targets(Cancelled).is_empty());
        assert!(allowed_targets(Completed).is_empty());
    }
}
