//! Type effectiveness chart.
//!
//! `effectiveness(attack, defend)` is not symmetric: fire→water is 0.5 but
//! water→fire is 2.0.

use crate::enums::ElementType;

struct Matchups {
    strong: &'static [ElementType],
    weak: &'static [ElementType],
    immune: &'static [ElementType],
}

fn matchups(attack: ElementType) -> Matchups {
    use ElementType::*;
    match attack {
        Normal => Matchups { strong: &[], weak: &[Rock, Steel], immune: &[Ghost] },
        Fire => Matchups {
            strong: &[Grass, Ice, Bug, Steel],
            weak: &[Fire, Water, Rock, Dragon],
            immune: &[],
        },
        Water => Matchups { strong: &[Fire, Ground, Rock], weak: &[Water, Grass, Dragon], immune: &[] },
        Electric => Matchups {
            strong: &[Water, Flying],
            weak: &[Electric, Grass, Dragon],
            immune: &[Ground],
        },
        Grass => Matchups {
            strong: &[Water, Ground, Rock],
            weak: &[Fire, Grass, Poison, Flying, Bug, Dragon, Steel],
            immune: &[],
        },
        Ice => Matchups {
            strong: &[Grass, Ground, Flying, Dragon],
            weak: &[Fire, Water, Ice, Steel],
            immune: &[],
        },
        Fighting => Matchups {
            strong: &[Normal, Ice, Rock, Dark, Steel],
            weak: &[Poison, Flying, Psychic, Bug, Fairy],
            immune: &[Ghost],
        },
        Poison => Matchups {
            strong: &[Grass, Fairy],
            weak: &[Poison, Ground, Rock, Ghost],
            immune: &[Steel],
        },
        Ground => Matchups {
            strong: &[Fire, Electric, Poison, Rock, Steel],
            weak: &[Grass, Bug],
            immune: &[Flying],
        },
        Flying => Matchups {
            strong: &[Grass, Fighting, Bug],
            weak: &[Electric, Rock, Steel],
            immune: &[],
        },
        Psychic => Matchups { strong: &[Fighting, Poison], weak: &[Psychic, Steel], immune: &[Dark] },
        Bug => Matchups {
            strong: &[Grass, Psychic, Dark],
            weak: &[Fire, Fighting, Poison, Flying, Ghost, Steel, Fairy],
            immune: &[],
        },
        Rock => Matchups {
            strong: &[Fire, Ice, Flying, Bug],
            weak: &[Fighting, Ground, Steel],
            immune: &[],
        },
        Ghost => Matchups { strong: &[Psychic, Ghost], weak: &[Dark], immune: &[Normal] },
        Dragon => Matchups { strong: &[Dragon], weak: &[Steel], immune: &[Fairy] },
        Dark => Matchups { strong: &[Psychic, Ghost], weak: &[Fighting, Dark, Fairy], immune: &[] },
        Steel => Matchups {
            strong: &[Ice, Rock, Fairy],
            weak: &[Fire, Water, Electric, Steel],
            immune: &[],
        },
        Fairy => Matchups {
            strong: &[Fighting, Dragon, Dark],
            weak: &[Fire, Poison, Steel],
            immune: &[],
        },
    }
}

/// Multiplier for a move of type `attack` hitting a single `defend` type.
pub fn effectiveness(attack: ElementType, defend: ElementType) -> f64 {
    let m = matchups(attack);
    if m.immune.contains(&defend) {
        0.0
    } else if m.strong.contains(&defend) {
        2.0
    } else if m.weak.contains(&defend) {
        0.5
    } else {
        1.0
    }
}

/// Combined multiplier against a (possibly dual-typed) defender.
pub fn effectiveness_against(attack: ElementType, defender_types: &[ElementType]) -> f64 {
    defender_types
        .iter()
        .map(|&t| effectiveness(attack, t))
        .product()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ElementType::*;

    #[test]
    fn chart_entries() {
        assert_eq!(effectiveness(Fire, Grass), 2.0);
        assert_eq!(effectiveness(Water, Fire), 2.0);
        assert_eq!(effectiveness(Normal, Ghost), 0.0);
        assert_eq!(effectiveness(Normal, Normal), 1.0);
    }

    #[test]
    fn chart_is_not_symmetric_in_value() {
        assert_eq!(effectiveness(Fire, Water), 0.5);
        assert_eq!(effectiveness(Water, Fire), 2.0);
        assert_eq!(effectiveness(Ghost, Normal), 0.0);
        assert_eq!(effectiveness(Electric, Ground), 0.0);
        assert_eq!(effectiveness(Ground, Electric), 2.0);
    }

    #[test]
    fn dual_types_multiply() {
        assert_eq!(effectiveness_against(Ice, &[Grass, Flying]), 4.0);
        assert_eq!(effectiveness_against(Fire, &[Water, Rock]), 0.25);
        assert_eq!(effectiveness_against(Ground, &[Fire, Flying]), 0.0);
        assert_eq!(effectiveness_against(Fire, &[]), 1.0);
    }
}
