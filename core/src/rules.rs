// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rule sets selected once per game

use serde::{Deserialize, Serialize};

/// Which repetitions are forbidden
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KoRule {
    /// No repetition check at all
    None,
    /// Forbid only the immediate one-stone recapture
    #[default]
    SimpleKo,
    /// Forbid any earlier stone arrangement
    PositionalSuperko,
    /// Forbid an earlier arrangement with the same player to move
    SituationalSuperko,
}

/// How the final score is counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringSystem {
    /// Stones on the board plus surrounded empty points
    AreaScoring,
    /// Surrounded empty points plus prisoners
    #[default]
    TerritoryScoring,
}

/// Number of consecutive passes that ends normal play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeAndDeathSettlingRule {
    #[default]
    TwoPasses,
    ThreePasses,
}

/// Who moves when play resumes to settle a dispute over dead stones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisputeResolutionRule {
    /// The player after the last mover continues
    #[default]
    AlternatingPlay,
    /// The players agree who moves first
    NonAlternatingPlay,
}

/// What four consecutive passes mean after play was resumed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FourPassesRule {
    /// Passes are counted against the settling rule again
    #[default]
    FourPassesHaveNoSpecialMeaning,
    /// Four passes end the game; all stones on the board are alive
    FourPassesEndTheGame,
}

/// Immutable rule bundle for one game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub ko_rule: KoRule,
    pub scoring_system: ScoringSystem,
    pub settling_rule: LifeAndDeathSettlingRule,
    pub dispute_resolution: DisputeResolutionRule,
    pub four_passes_rule: FourPassesRule,
}

impl Default for Rules {
    fn default() -> Self {
        Self::japanese()
    }
}

impl Rules {
    pub fn japanese() -> Self {
        Self {
            ko_rule: KoRule::SimpleKo,
            scoring_system: ScoringSystem::TerritoryScoring,
            settling_rule: LifeAndDeathSettlingRule::TwoPasses,
            dispute_resolution: DisputeResolutionRule::NonAlternatingPlay,
            four_passes_rule: FourPassesRule::FourPassesHaveNoSpecialMeaning,
        }
    }

    pub fn chinese() -> Self {
        Self {
            ko_rule: KoRule::PositionalSuperko,
            scoring_system: ScoringSystem::AreaScoring,
            settling_rule: LifeAndDeathSettlingRule::TwoPasses,
            dispute_resolution: DisputeResolutionRule::AlternatingPlay,
            four_passes_rule: FourPassesRule::FourPassesHaveNoSpecialMeaning,
        }
    }

    pub fn aga() -> Self {
        Self {
            ko_rule: KoRule::SituationalSuperko,
            scoring_system: ScoringSystem::AreaScoring,
            settling_rule: LifeAndDeathSettlingRule::TwoPasses,
            dispute_resolution: DisputeResolutionRule::AlternatingPlay,
            four_passes_rule: FourPassesRule::FourPassesEndTheGame,
        }
    }

    pub fn new_zealand() -> Self {
        Self {
            ko_rule: KoRule::SituationalSuperko,
            scoring_system: ScoringSystem::AreaScoring,
            settling_rule: LifeAndDeathSettlingRule::TwoPasses,
            dispute_resolution: DisputeResolutionRule::AlternatingPlay,
            four_passes_rule: FourPassesRule::FourPassesHaveNoSpecialMeaning,
        }
    }

    /// Look up a preset by name (`japanese`, `chinese`, `aga`, `new_zealand`)
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().replace('-', "_").as_str() {
            "japanese" => Some(Self::japanese()),
            "chinese" => Some(Self::chinese()),
            "aga" => Some(Self::aga()),
            "new_zealand" | "nz" => Some(Self::new_zealand()),
            _ => None,
        }
    }

    /// Consecutive passes that end normal play
    pub fn passes_to_end(&self) -> u32 {
        match self.settling_rule {
            LifeAndDeathSettlingRule::TwoPasses => 2,
            LifeAndDeathSettlingRule::ThreePasses => 3,
        }
    }

    /// Customary komi for the scoring system
    pub fn standard_komi(&self) -> f32 {
        match self.scoring_system {
            ScoringSystem::AreaScoring => 7.5,
            ScoringSystem::TerritoryScoring => 6.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_by_name() {
        assert_eq!(Rules::preset("Chinese"), Some(Rules::chinese()));
        assert_eq!(Rules::preset("new-zealand"), Some(Rules::new_zealand()));
        assert_eq!(Rules::preset("ing"), None);
        assert_eq!(Rules::default(), Rules::japanese());
    }

    #[test]
    fn pass_threshold_follows_settling_rule() {
        let mut rules = Rules::japanese();
        assert_eq!(rules.passes_to_end(), 2);
        rules.settling_rule = LifeAndDeathSettlingRule::ThreePasses;
        assert_eq!(rules.passes_to_end(), 3);
    }

    #[test]
    fn partial_rules_deserialize_with_defaults() {
        let rules: Rules = serde_json::from_str(r#"{"ko_rule":"situational_superko"}"#).unwrap();
        assert_eq!(rules.ko_rule, KoRule::SituationalSuperko);
        assert_eq!(rules.scoring_system, Rules::japanese().scoring_system);
    }
}
