//! Hizb slot allocation.
//!
//! Assigns portions first-fit over the group's hizb, 1 to `total`. Only
//! active (non-cancelled) participations occupy their range.

use thiserror::Error;

use crate::models::{GroupProgress, HizbRange, Participation};

/// Errors raised while choosing or checking a hizb range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    #[error("Part invalide (choisir 1 ou 2).")]
    InvalidSize(i32),

    #[error("Total de hizb invalide.")]
    InvalidTotal(i32),

    #[error("Plage de hizb invalide.")]
    InvalidRange(HizbRange),

    #[error("Plus de hizb disponibles pour cette taille")]
    NoSlotAvailable(i32),

    #[error("Hizb déjà réservé ({}-{}).", .0.start, .0.end)]
    AlreadyTaken(HizbRange),
}

fn check_size(size: i32) -> Result<(), SlotError> {
    match size {
        1 | 2 => Ok(()),
        _ => Err(SlotError::InvalidSize(size)),
    }
}

fn check_total(total: i32) -> Result<(), SlotError> {
    if total > 0 {
        Ok(())
    } else {
        Err(SlotError::InvalidTotal(total))
    }
}

/// Marks every hizb held by an active participation. Index 0 is unused.
fn claimed_units(participations: &[Participation], total: i32) -> Vec<bool> {
    let mut taken = vec![false; total as usize + 1];
    for p in participations.iter().filter(|p| p.is_active()) {
        let start = p.start_hizb.max(1);
        let end = p.end_hizb.min(total);
        for hizb in start..=end {
            taken[hizb as usize] = true;
        }
    }
    taken
}

/// Finds the first free range of `size` hizb (1 or 2) among `1..=total`.
pub fn compute_next_slot(
    participations: &[Participation],
    size: i32,
    total: i32,
) -> Result<HizbRange, SlotError> {
    check_size(size)?;
    check_total(total)?;

    let taken = claimed_units(participations, total);
    let is_free = |hizb: i32| !taken[hizb as usize];

    (1..=total - size + 1)
        .find(|&start| (start..start + size).all(is_free))
        .map(|start| HizbRange::new(start, start + size - 1))
        .ok_or(SlotError::NoSlotAvailable(size))
}

/// Checks a caller-chosen range before it is claimed.
pub fn validate_range(size: i32, range: HizbRange, total: i32) -> Result<HizbRange, SlotError> {
    check_size(size)?;
    check_total(total)?;

    if range.start < 1 || range.start > range.end || range.end > total || range.len() != size {
        return Err(SlotError::InvalidRange(range));
    }
    Ok(range)
}

/// Returns the first active participation whose range intersects `range`.
pub fn find_overlap(participations: &[Participation], range: HizbRange) -> Option<&Participation> {
    participations
        .iter()
        .filter(|p| p.is_active())
        .find(|p| p.range().overlaps(&range))
}

/// Summarizes how much of the group's reading is claimed and completed.
pub fn group_progress(participations: &[Participation], total: i32) -> GroupProgress {
    let active: Vec<&Participation> = participations.iter().filter(|p| p.is_active()).collect();
    let total = total.max(0);

    let claimed_hizb = claimed_units(participations, total)
        .iter()
        .filter(|&&taken| taken)
        .count() as i32;
    let completed_hizb = active
        .iter()
        .filter(|p| p.completed)
        .map(|p| p.range().len())
        .sum::<i32>()
        .min(total);

    GroupProgress {
        total_hizb: total,
        claimed_hizb,
        completed_hizb,
        remaining_hizb: total - completed_hizb,
        participant_count: active.len(),
    }
}
