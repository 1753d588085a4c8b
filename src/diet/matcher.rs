//! Diet-plan lookup for a calorie target.
//!
//! Two phases: plans whose range contains the target win outright; otherwise
//! the plan whose range midpoint is nearest the target is picked. Ties in
//! either phase go to the lowest `calorie_min`, then the oldest plan, then the
//! lowest id, so the result never depends on store ordering.

use std::cmp::Ordering;

use serde::Serialize;
use tracing::debug;

use super::calories::{ActivityLevel, Goal};
use super::repo_types::DietPlan;
use super::store::PlanStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Exact,
    Closest,
}

#[derive(Debug, Clone)]
pub struct PlanMatch {
    pub plan: DietPlan,
    pub kind: MatchKind,
}

fn tie_break(a: &DietPlan, b: &DietPlan) -> Ordering {
    a.calorie_min
        .cmp(&b.calorie_min)
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Active plan whose range contains `target`.
pub fn pick_exact(candidates: Vec<DietPlan>, target: i32) -> Option<DietPlan> {
    candidates
        .into_iter()
        .filter(|p| p.is_active && p.contains(target))
        .min_by(tie_break)
}

/// Active plan with the smallest midpoint distance to `target`.
pub fn pick_closest(candidates: Vec<DietPlan>, target: i32) -> Option<DietPlan> {
    candidates
        .into_iter()
        .filter(|p| p.is_active)
        .min_by(|a, b| {
            a.midpoint_distance_x2(target)
                .cmp(&b.midpoint_distance_x2(target))
                .then_with(|| tie_break(a, b))
        })
}

pub struct PlanMatcher<'a> {
    store: &'a dyn PlanStore,
}

impl<'a> PlanMatcher<'a> {
    pub fn new(store: &'a dyn PlanStore) -> Self {
        Self { store }
    }

    /// `Ok(None)` means no active plan exists for the goal/activity pair.
    pub async fn find_plan(
        &self,
        target: i32,
        goal: Goal,
        activity: ActivityLevel,
    ) -> anyhow::Result<Option<PlanMatch>> {
        let in_range = self.store.find_in_range(goal, activity, target).await?;
        if let Some(plan) = pick_exact(in_range, target) {
            debug!(plan_id = %plan.id, target, "exact plan match");
            return Ok(Some(PlanMatch {
                plan,
                kind: MatchKind::Exact,
            }));
        }

        let candidates = self.store.find_candidates(goal, activity).await?;
        debug!(candidates = candidates.len(), target, "no exact match, falling back to closest");
        Ok(pick_closest(candidates, target).map(|plan| PlanMatch {
            plan,
            kind: MatchKind::Closest,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diet::memory::{plan_fixture, MemoryPlanStore};

    fn weight_loss_moderate(min: i32, max: i32) -> DietPlan {
        plan_fixture("Weight Loss", "Moderate", min, max)
    }

    #[test]
    fn exact_prefers_lowest_min_on_overlap() {
        let wide = weight_loss_moderate(1500, 2500);
        let narrow = weight_loss_moderate(1900, 2100);
        let picked = pick_exact(vec![narrow, wide.clone()], 2000).unwrap();
        assert_eq!(picked.id, wide.id);
    }

    #[test]
    fn closest_uses_midpoint_distance() {
        let low = weight_loss_moderate(1800, 2200); // midpoint 2000
        let high = weight_loss_moderate(2300, 2600); // midpoint 2450
        let picked = pick_closest(vec![low, high.clone()], 2250).unwrap();
        assert_eq!(picked.id, high.id);
    }

    #[test]
    fn closest_tie_returns_a_minimiser() {
        let a = weight_loss_moderate(1800, 2200); // midpoint 2000
        let b = weight_loss_moderate(2400, 2600); // midpoint 2500
        let far = weight_loss_moderate(3000, 3400);
        let picked = pick_closest(vec![far.clone(), b.clone(), a.clone()], 2250).unwrap();
        assert_ne!(picked.id, far.id);
        // equal distance: lowest calorie_min wins
        assert_eq!(picked.id, a.id);
    }

    #[test]
    fn half_kcal_midpoints_compare_exactly() {
        let odd = weight_loss_moderate(2000, 2001); // midpoint 2000.5
        let even = weight_loss_moderate(1990, 2010); // midpoint 2000
        let picked = pick_closest(vec![odd, even.clone()], 2000).unwrap();
        assert_eq!(picked.id, even.id);
    }

    #[test]
    fn inactive_plans_are_never_picked() {
        let mut inactive = weight_loss_moderate(1800, 2200);
        inactive.is_active = false;
        assert!(pick_exact(vec![inactive.clone()], 2000).is_none());
        assert!(pick_closest(vec![inactive], 2000).is_none());
    }

    #[tokio::test]
    async fn scenario_exact_match_wins() {
        let store = MemoryPlanStore::with_plans(vec![
            weight_loss_moderate(1800, 2200),
            weight_loss_moderate(2300, 2600),
        ])
        .await;
        let m = PlanMatcher::new(&store)
            .find_plan(2094, Goal::WeightLoss, ActivityLevel::Moderate)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(m.kind, MatchKind::Exact);
        assert_eq!((m.plan.calorie_min, m.plan.calorie_max), (1800, 2200));
        assert!(m.plan.contains(2094));
    }

    #[tokio::test]
    async fn scenario_gap_falls_back_to_closest() {
        let store = MemoryPlanStore::with_plans(vec![
            weight_loss_moderate(1800, 2200),
            weight_loss_moderate(2300, 2600),
        ])
        .await;
        let m = PlanMatcher::new(&store)
            .find_plan(2250, Goal::WeightLoss, ActivityLevel::Moderate)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(m.kind, MatchKind::Closest);
        assert_eq!((m.plan.calorie_min, m.plan.calorie_max), (2300, 2600));
        assert!(!m.plan.contains(2250));
    }

    #[tokio::test]
    async fn exact_beats_closer_midpoint() {
        // target 2190 sits in the wide range but is nearer the narrow one's midpoint
        let wide = weight_loss_moderate(1000, 2200);
        let narrow = weight_loss_moderate(2250, 2300);
        let store = MemoryPlanStore::with_plans(vec![narrow, wide.clone()]).await;
        let m = PlanMatcher::new(&store)
            .find_plan(2190, Goal::WeightLoss, ActivityLevel::Moderate)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(m.kind, MatchKind::Exact);
        assert_eq!(m.plan.id, wide.id);
    }

    #[tokio::test]
    async fn no_plans_for_goal_and_activity() {
        let store = MemoryPlanStore::with_plans(vec![weight_loss_moderate(1800, 2200)]).await;
        let m = PlanMatcher::new(&store)
            .find_plan(3000, Goal::WeightGain, ActivityLevel::Active)
            .await
            .unwrap();
        assert!(m.is_none());
    }

    #[tokio::test]
    async fn other_activity_levels_are_ignored() {
        let sedentary = plan_fixture("Weight Loss", "Sedentary", 2000, 2100);
        let moderate = weight_loss_moderate(2600, 2800);
        let store = MemoryPlanStore::with_plans(vec![sedentary, moderate.clone()]).await;
        let m = PlanMatcher::new(&store)
            .find_plan(2050, Goal::WeightLoss, ActivityLevel::Moderate)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(m.kind, MatchKind::Closest);
        assert_eq!(m.plan.id, moderate.id);
    }

    #[tokio::test]
    async fn inactive_plan_skipped_in_both_phases() {
        let mut inactive = weight_loss_moderate(2000, 2200);
        inactive.is_active = false;
        let active = weight_loss_moderate(2600, 2800);
        let store = MemoryPlanStore::with_plans(vec![inactive, active.clone()]).await;
        let m = PlanMatcher::new(&store)
            .find_plan(2100, Goal::WeightLoss, ActivityLevel::Moderate)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(m.kind, MatchKind::Closest);
        assert_eq!(m.plan.id, active.id);
    }
}
