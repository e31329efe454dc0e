use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One member of the closed set of map tile categories.
///
/// The discriminant doubles as a dense index into rule tables, so lookups
/// are plain array accesses rather than hashed ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TileType {
    /// Open water.
    Ocean,
    /// Beach bordering water.
    Sand,
    /// Dense tree cover.
    Forest,
    /// Bare rock.
    Stone,
    /// Open grassland.
    Grass,
}

impl TileType {
    /// Number of tile types in the universe.
    pub const COUNT: usize = 5;

    /// Every tile type, in ordinal order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Ocean,
        Self::Sand,
        Self::Forest,
        Self::Stone,
        Self::Grass,
    ];

    /// The ordinal of this tile type, in `0..COUNT`.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Recovers a tile type from its ordinal.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The canonical lower-case name of this tile type.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ocean => "ocean",
            Self::Sand => "sand",
            Self::Forest => "forest",
            Self::Stone => "stone",
            Self::Grass => "grass",
        }
    }

    /// Looks a tile type up by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(name))
    }
}

/// Errors that can occur while constructing a rule or rule set.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleSetError {
    /// A neighbor weight below zero was supplied for a rule.
    #[error("negative weight {weight} for neighbor {neighbor:?} of {root:?}")]
    NegativeWeight {
        /// The rule's root tile type.
        root: TileType,
        /// The neighbor the weight was given for.
        neighbor: TileType,
        /// The offending raw weight.
        weight: f32,
    },
    /// The raw weights for a rule summed to zero or less.
    #[error("neighbor weights for {0:?} must sum to a positive value")]
    NonPositiveWeightSum(TileType),
    /// No rule was supplied for a tile type.
    #[error("missing rule for tile type {0:?}")]
    MissingRule(TileType),
    /// More than one rule was supplied for the same tile type.
    #[error("duplicate rule for tile type {0:?}")]
    DuplicateRule(TileType),
}

/// The weighted neighbor rule for a single root tile type.
///
/// Weights are normalized at construction so they sum to 1.0 across the
/// whole tile universe; types not mentioned in the input carry weight 0.0,
/// which means "not allowed as a neighbor".
#[derive(Debug, Clone, PartialEq)]
pub struct TileRule {
    root: TileType,
    weights: [f32; TileType::COUNT],
}

impl TileRule {
    /// Builds the rule for `root` from raw `(neighbor, weight)` pairs.
    ///
    /// Repeated neighbors accumulate. Fails if any weight is negative or
    /// if the weights sum to zero or less.
    pub fn new(
        root: TileType,
        neighbor_weights: impl IntoIterator<Item = (TileType, f32)>,
    ) -> Result<Self, RuleSetError> {
        let mut weights = [0.0_f32; TileType::COUNT];
        for (neighbor, weight) in neighbor_weights {
            if weight < 0.0 {
                return Err(RuleSetError::NegativeWeight {
                    root,
                    neighbor,
                    weight,
                });
            }
            weights[neighbor.index()] += weight;
        }

        let sum: f32 = weights.iter().sum();
        if sum <= 0.0 {
            return Err(RuleSetError::NonPositiveWeightSum(root));
        }
        for weight in &mut weights {
            *weight /= sum;
        }

        Ok(Self { root, weights })
    }

    /// The root tile type this rule is keyed by.
    pub const fn root(&self) -> TileType {
        self.root
    }

    /// The normalized weight of `neighbor` next to this rule's root.
    #[inline]
    pub fn weight(&self, neighbor: TileType) -> f32 {
        self.weights[neighbor.index()]
    }

    /// The full normalized weight row, indexed by tile ordinal.
    pub const fn weights(&self) -> &[f32; TileType::COUNT] {
        &self.weights
    }
}

/// An immutable set of adjacency rules, one per tile type.
///
/// Rule storage is directional (each rule is keyed by its root), but the
/// adjacency predicate is symmetrized at construction time: a pair is an
/// allowed neighbor pair if either direction carries a positive weight.
/// Directional weights stay reachable through [`TileRuleSet::weight`].
#[derive(Debug, Clone, PartialEq)]
pub struct TileRuleSet {
    rules: [TileRule; TileType::COUNT],
    allowed: [[bool; TileType::COUNT]; TileType::COUNT],
}

impl TileRuleSet {
    /// Builds a rule set from exactly one rule per tile type.
    ///
    /// Fails if any type is missing a rule or has more than one.
    pub fn new(rules: impl IntoIterator<Item = TileRule>) -> Result<Self, RuleSetError> {
        let mut slots: [Option<TileRule>; TileType::COUNT] = Default::default();
        for rule in rules {
            let slot = &mut slots[rule.root().index()];
            if slot.is_some() {
                return Err(RuleSetError::DuplicateRule(rule.root()));
            }
            *slot = Some(rule);
        }

        let mut collected = Vec::with_capacity(TileType::COUNT);
        for (index, slot) in slots.into_iter().enumerate() {
            match slot {
                Some(rule) => collected.push(rule),
                None => {
                    // from_index cannot miss: index ranges over 0..COUNT
                    let tile = TileType::from_index(index)
                        .unwrap_or(TileType::ALL[0]);
                    return Err(RuleSetError::MissingRule(tile));
                }
            }
        }
        let rules: [TileRule; TileType::COUNT] = match collected.try_into() {
            Ok(rules) => rules,
            Err(_) => unreachable!("exactly COUNT rules collected"),
        };

        let mut allowed = [[false; TileType::COUNT]; TileType::COUNT];
        for a in TileType::ALL {
            for b in TileType::ALL {
                let forward = rules[a.index()].weight(b) > 0.0;
                let reverse = rules[b.index()].weight(a) > 0.0;
                allowed[a.index()][b.index()] = forward || reverse;
            }
        }

        Ok(Self { rules, allowed })
    }

    /// The rule keyed by `tile`.
    pub fn rule(&self, tile: TileType) -> &TileRule {
        &self.rules[tile.index()]
    }

    /// The tile types allowed next to `tile`, in ordinal order.
    pub fn allowed_neighbors(&self, tile: TileType) -> Vec<TileType> {
        TileType::ALL
            .into_iter()
            .filter(|&other| self.is_allowed_neighbor(tile, other))
            .collect()
    }

    /// Whether `neighbor` may sit next to `tile` (symmetric).
    #[inline]
    pub fn is_allowed_neighbor(&self, tile: TileType, neighbor: TileType) -> bool {
        self.allowed[tile.index()][neighbor.index()]
    }

    /// The directional normalized weight of `neighbor` next to `tile`.
    #[inline]
    pub fn weight(&self, tile: TileType, neighbor: TileType) -> f32 {
        self.rule(tile).weight(neighbor)
    }
}

/// The built-in island rule set: ocean borders only ocean and sand, sand
/// borders everything, and the inland types border everything but ocean.
pub fn island_rule_set() -> TileRuleSet {
    use TileType::{Forest, Grass, Ocean, Sand, Stone};

    let land = [(Sand, 1.0), (Forest, 1.0), (Grass, 1.0), (Stone, 1.0)];
    let rules = [
        TileRule::new(Ocean, [(Ocean, 1.0), (Sand, 1.0)]),
        TileRule::new(Sand, [(Ocean, 1.0), (Sand, 1.0), (Forest, 1.0), (Grass, 1.0), (Stone, 1.0)]),
        TileRule::new(Forest, land),
        TileRule::new(Grass, land),
        TileRule::new(Stone, land),
    ];
    let rules = rules.map(|rule| match rule {
        Ok(rule) => rule,
        Err(_) => unreachable!("island preset weights are positive"),
    });

    match TileRuleSet::new(rules) {
        Ok(set) => set,
        Err(_) => unreachable!("island preset covers every tile type once"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_type_roundtrips_through_index_and_name() {
        for tile in TileType::ALL {
            assert_eq!(TileType::from_index(tile.index()), Some(tile));
            assert_eq!(TileType::from_name(tile.name()), Some(tile));
        }
        assert_eq!(TileType::from_name("OCEAN"), Some(TileType::Ocean));
        assert_eq!(TileType::from_name("swamp"), None);
        assert_eq!(TileType::from_index(TileType::COUNT), None);
    }

    #[test]
    fn rule_rejects_non_positive_weight_sum() {
        let empty = TileRule::new(TileType::Ocean, []);
        assert_eq!(
            empty,
            Err(RuleSetError::NonPositiveWeightSum(TileType::Ocean))
        );

        let zeroed = TileRule::new(TileType::Ocean, [(TileType::Sand, 0.0)]);
        assert_eq!(
            zeroed,
            Err(RuleSetError::NonPositiveWeightSum(TileType::Ocean))
        );
    }

    #[test]
    fn rule_rejects_negative_weight() {
        let result = TileRule::new(TileType::Grass, [(TileType::Sand, -1.0)]);
        assert!(matches!(
            result,
            Err(RuleSetError::NegativeWeight {
                root: TileType::Grass,
                neighbor: TileType::Sand,
                ..
            })
        ));
    }

    #[test]
    fn rule_set_requires_one_rule_per_type() {
        let one = TileRule::new(TileType::Ocean, [(TileType::Ocean, 1.0)]).unwrap();
        assert_eq!(
            TileRuleSet::new([one.clone()]),
            Err(RuleSetError::MissingRule(TileType::Sand))
        );

        let mut rules: Vec<TileRule> = island_rule_set_rules();
        rules.push(one);
        assert_eq!(
            TileRuleSet::new(rules),
            Err(RuleSetError::DuplicateRule(TileType::Ocean))
        );
    }

    fn island_rule_set_rules() -> Vec<TileRule> {
        let set = island_rule_set();
        TileType::ALL.iter().map(|&t| set.rule(t).clone()).collect()
    }

    #[test]
    fn island_weights_are_normalized() {
        let set = island_rule_set();
        for tile in TileType::ALL {
            let sum: f32 = set.rule(tile).weights().iter().sum();
            assert!((sum - 1.0).abs() < 1e-6, "{tile:?} weights sum to {sum}");
        }
    }

    #[test]
    fn island_adjacency_matches_preset() {
        let set = island_rule_set();
        assert_eq!(
            set.allowed_neighbors(TileType::Ocean),
            vec![TileType::Ocean, TileType::Sand]
        );
        assert!(set.is_allowed_neighbor(TileType::Sand, TileType::Forest));
        assert!(!set.is_allowed_neighbor(TileType::Ocean, TileType::Forest));
        assert!(!set.is_allowed_neighbor(TileType::Forest, TileType::Ocean));
        assert_eq!(set.weight(TileType::Ocean, TileType::Sand), 0.5);
        assert_eq!(set.weight(TileType::Ocean, TileType::Grass), 0.0);
    }

    #[test]
    fn adjacency_is_symmetrized_from_either_direction() {
        // Grass's rule omits ocean, but give ocean a one-way weight toward
        // grass; the symmetrized predicate must allow both orderings.
        let rules = [
            TileRule::new(TileType::Ocean, [(TileType::Ocean, 1.0), (TileType::Grass, 1.0)]).unwrap(),
            TileRule::new(TileType::Sand, [(TileType::Sand, 1.0)]).unwrap(),
            TileRule::new(TileType::Forest, [(TileType::Forest, 1.0)]).unwrap(),
            TileRule::new(TileType::Stone, [(TileType::Stone, 1.0)]).unwrap(),
            TileRule::new(TileType::Grass, [(TileType::Grass, 1.0)]).unwrap(),
        ];
        let set = TileRuleSet::new(rules).unwrap();

        assert!(set.is_allowed_neighbor(TileType::Ocean, TileType::Grass));
        assert!(set.is_allowed_neighbor(TileType::Grass, TileType::Ocean));
        // The directional weight still reflects storage.
        assert_eq!(set.weight(TileType::Grass, TileType::Ocean), 0.0);
        assert!(set.weight(TileType::Ocean, TileType::Grass) > 0.0);
    }
}
