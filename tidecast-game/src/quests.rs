//! Guide quests: catch-count goals with one-shot rewards.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::fish::CaughtFish;
use crate::tuning::TuningLoadError;

const CATCH_COUNT: &str = "catch_count";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalDef {
    /// Filled in as `goal_<index>` when the document leaves it out.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(rename = "type", default = "GoalDef::default_kind")]
    pub kind: String,
    #[serde(default = "GoalDef::default_filter")]
    pub filter: String,
    #[serde(default = "GoalDef::default_target")]
    pub target: i64,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub reward_money: i64,
    #[serde(default)]
    pub reward_text: String,
}

impl GoalDef {
    fn default_kind() -> String {
        String::from(CATCH_COUNT)
    }

    fn default_filter() -> String {
        String::from("any")
    }

    const fn default_target() -> i64 {
        1
    }

    fn counts_catches(&self) -> bool {
        self.kind.eq_ignore_ascii_case(CATCH_COUNT)
    }

    /// Whether a catch advances this goal.
    ///
    /// Filters: empty or `any` match everything, `rarity:golden` matches golden
    /// fish, `name:<display name>` matches case-insensitively. Anything else
    /// never matches.
    #[must_use]
    pub fn matches(&self, fish: &CaughtFish) -> bool {
        let filter = self.filter.trim().to_lowercase();
        if filter.is_empty() || filter == "any" {
            return true;
        }
        if let Some(rarity) = filter.strip_prefix("rarity:") {
            return rarity == "golden" && fish.golden;
        }
        if let Some(name) = filter.strip_prefix("name:") {
            return fish.name.to_lowercase() == name.trim();
        }
        false
    }

    fn reward_annotation(&self) -> Option<String> {
        if !self.reward_text.is_empty() {
            Some(self.reward_text.clone())
        } else if self.reward_money > 0 {
            Some(format!("+{} Coins", self.reward_money))
        } else {
            None
        }
    }

    fn has_reward(&self) -> bool {
        self.reward_money > 0 || !self.reward_text.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestDef {
    #[serde(default = "QuestDef::default_title")]
    pub title: String,
    #[serde(default)]
    pub goals: Vec<GoalDef>,
}

impl Default for QuestDef {
    fn default() -> Self {
        Self::builtin()
    }
}

impl QuestDef {
    fn default_title() -> String {
        String::from("Guide")
    }

    /// The starter guide: six of anything, then two golden fish.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            title: String::from("Fishing Guide"),
            goals: vec![
                GoalDef {
                    id: String::from("catch_any"),
                    text: String::from("Catch 6 Fish"),
                    kind: GoalDef::default_kind(),
                    filter: GoalDef::default_filter(),
                    target: 6,
                    optional: false,
                    reward_money: 150,
                    reward_text: String::new(),
                },
                GoalDef {
                    id: String::from("catch_golden"),
                    text: String::from("Catch 2 Golden Fish"),
                    kind: GoalDef::default_kind(),
                    filter: String::from("rarity:golden"),
                    target: 2,
                    optional: false,
                    reward_money: 250,
                    reward_text: String::from("Bonus Chest"),
                },
            ],
        }
    }

    /// Parse a quest document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid JSON.
    pub fn from_json(json: &str) -> Result<Self, TuningLoadError> {
        let mut def: Self =
            serde_json::from_str(json).map_err(|source| TuningLoadError::Malformed {
                table: "quests",
                source,
            })?;
        def.assign_missing_ids();
        Ok(def)
    }

    fn assign_missing_ids(&mut self) {
        let mut taken: HashSet<String> = self
            .goals
            .iter()
            .filter(|goal| !goal.id.trim().is_empty())
            .map(|goal| goal.id.clone())
            .collect();
        for (index, goal) in self.goals.iter_mut().enumerate() {
            if !goal.id.trim().is_empty() {
                continue;
            }
            let mut id = format!("goal_{index}");
            while taken.contains(&id) {
                id.push('_');
            }
            log::warn!("quest goal {index} has no id; using `{id}`");
            taken.insert(id.clone());
            goal.id = id;
        }
    }
}

/// Reward released by a newly completed goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalPayout {
    pub goal_id: String,
    pub money: i64,
    pub reward_text: String,
}

/// Live progress against one quest definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestLog {
    def: QuestDef,
    counters: HashMap<String, u32>,
    completed: HashSet<String>,
    paid: HashSet<String>,
}

impl QuestLog {
    #[must_use]
    pub fn new(def: QuestDef) -> Self {
        Self {
            def,
            counters: HashMap::new(),
            completed: HashSet::new(),
            paid: HashSet::new(),
        }
    }

    #[must_use]
    pub const fn def(&self) -> &QuestDef {
        &self.def
    }

    /// Count a landed fish against every matching catch goal.
    pub fn on_fish_caught(&mut self, fish: &CaughtFish) {
        for goal in &self.def.goals {
            if !goal.counts_catches() || !goal.matches(fish) {
                continue;
            }
            let count = self.counters.entry(goal.id.clone()).or_insert(0);
            *count = count.saturating_add(1);
            if goal.target > 0 && i64::from(*count) >= goal.target {
                self.completed.insert(goal.id.clone());
            }
        }
    }

    /// Payouts for goals completed since the last call. Each goal pays at most
    /// once; completed goals without a reward pay nothing.
    pub fn collect_payouts(&mut self) -> Vec<GoalPayout> {
        let mut payouts = Vec::new();
        for goal in &self.def.goals {
            if !self.completed.contains(&goal.id) || !self.paid.insert(goal.id.clone()) {
                continue;
            }
            if goal.has_reward() {
                log::debug!("quest goal {} paid {} ({})", goal.id, goal.reward_money, goal.reward_text);
                payouts.push(GoalPayout {
                    goal_id: goal.id.clone(),
                    money: goal.reward_money,
                    reward_text: goal.reward_text.clone(),
                });
            }
        }
        payouts
    }

    #[must_use]
    pub fn count(&self, goal_id: &str) -> u32 {
        self.counters.get(goal_id).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn is_completed(&self, goal_id: &str) -> bool {
        self.completed.contains(goal_id)
    }

    /// True once every required goal is complete.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.def
            .goals
            .iter()
            .filter(|goal| !goal.optional)
            .all(|goal| self.is_completed(&goal.id))
    }

    /// Display text such as `Catch 6 Fish (2/6) - +150 Coins`.
    #[must_use]
    pub fn goal_label(&self, goal: &GoalDef) -> String {
        let mut label = goal.text.clone();
        if goal.counts_catches() && goal.target > 0 {
            let current = i64::from(self.count(&goal.id)).min(goal.target);
            label.push_str(&format!(" ({current}/{})", goal.target));
        }
        if let Some(annotation) = goal.reward_annotation() {
            label.push_str(" - ");
            label.push_str(&annotation);
        }
        label
    }
}
