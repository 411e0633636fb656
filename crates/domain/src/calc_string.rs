//! Codec for the persisted calculation string.
//!
//! Grammar (one segment per presets type, at most two segments):
//!
//! ```text
//! calc-string   = segment *("/" segment)
//! segment       = ("e" / "d") "[" [ item *("," item) ] "]" "x" multiplier
//! item          = "p" positive-int / "n" decimal / "c(" expr ")" [ "x" multiplier ]
//! ```
//!
//! `e[...]` holds the equipment sub-list, `d[...]` the distance sub-list.
//! An item multiplier that rounds to 1 is omitted; absence reads back as 1.
//!
//! Parsing is lenient throughout: malformed segments and tokens are skipped
//! and reported as diagnostics, never raised as errors, so a corrupt
//! persisted string can never block the caller.

use std::fmt;

use log::warn;

use crate::{
    calculation::{CalculationItem, CalculationItemKind, CalculationList, Multiplier},
    format_two_places,
    preset::{
        DistancePreset, EquipmentWeight, PresetID, PresetsType, resolve_distance_preset,
        resolve_equipment_weight,
    },
    round_to_two_places,
};

/// One token of a segment body, before preset resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemToken {
    Preset(PresetID, Multiplier),
    Number(f32, Multiplier),
    Expression(String, Multiplier),
}

impl From<&CalculationItem> for ItemToken {
    fn from(item: &CalculationItem) -> Self {
        match &item.kind {
            CalculationItemKind::Preset(id) => ItemToken::Preset(*id, item.multiplier),
            CalculationItemKind::Number => {
                ItemToken::Number(round_to_two_places(item.value), item.multiplier)
            }
            CalculationItemKind::Expression(text) => {
                ItemToken::Expression(text.clone(), item.multiplier)
            }
        }
    }
}

impl fmt::Display for ItemToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let multiplier = match self {
            ItemToken::Preset(id, multiplier) => {
                write!(f, "p{id}")?;
                multiplier
            }
            ItemToken::Number(value, multiplier) => {
                write!(f, "n{}", format_two_places(*value))?;
                multiplier
            }
            ItemToken::Expression(text, multiplier) => {
                write!(f, "c({text})")?;
                multiplier
            }
        };
        if multiplier.is_default() {
            Ok(())
        } else {
            write!(f, "x{multiplier}")
        }
    }
}

/// The `e[...]` or `d[...]` portion of a calculation string.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub presets_type: PresetsType,
    pub items: Vec<ItemToken>,
    pub total_multiplier: Multiplier,
}

impl Segment {
    fn from_list(list: &CalculationList) -> Self {
        Self {
            presets_type: list.presets_type(),
            items: list.items().iter().map(ItemToken::from).collect(),
            total_multiplier: list.total_multiplier(),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.presets_type {
            PresetsType::Equipment => 'e',
            PresetsType::Distance => 'd',
        };
        write!(f, "{tag}[")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{item}")?;
        }
        write!(f, "]x{}", self.total_multiplier)
    }
}

/// Structured form of a whole persisted calculation string. At most one
/// segment per tag can exist, so this is a fixed two-slot record rather than
/// a list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalculationString {
    pub equipment: Option<Segment>,
    pub distance: Option<Segment>,
}

impl CalculationString {
    /// Lenient parse. Unrecognized segments and malformed tokens are dropped
    /// and returned as diagnostics; duplicate tags keep the first occurrence.
    #[must_use]
    pub fn parse(text: &str) -> (Self, Vec<SkippedToken>) {
        let mut result = Self::default();
        let mut skipped = Vec::new();

        for part in split_outside_parens(text, '/') {
            let Some((presets_type, body, total_multiplier)) = parse_segment_parts(part) else {
                if !part.is_empty() {
                    skipped.push(SkippedToken {
                        token: part.to_string(),
                        reason: SkipReason::UnrecognizedSyntax,
                    });
                }
                continue;
            };

            let slot = match presets_type {
                PresetsType::Equipment => &mut result.equipment,
                PresetsType::Distance => &mut result.distance,
            };
            if slot.is_some() {
                skipped.push(SkippedToken {
                    token: part.to_string(),
                    reason: SkipReason::DuplicateTag,
                });
                continue;
            }

            let mut items = Vec::new();
            if !body.is_empty() {
                for token in split_outside_parens(body, ',') {
                    match parse_item_token(token) {
                        Some(item) => items.push(item),
                        None => skipped.push(SkippedToken {
                            token: token.to_string(),
                            reason: SkipReason::UnrecognizedSyntax,
                        }),
                    }
                }
            }

            *slot = Some(Segment {
                presets_type,
                items,
                total_multiplier,
            });
        }

        (result, skipped)
    }

    #[must_use]
    pub fn segment(&self, presets_type: PresetsType) -> Option<&Segment> {
        match presets_type {
            PresetsType::Equipment => self.equipment.as_ref(),
            PresetsType::Distance => self.distance.as_ref(),
        }
    }
}

impl fmt::Display for CalculationString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.equipment, &self.distance) {
            (Some(equipment), Some(distance)) => write!(f, "{equipment}/{distance}"),
            (Some(equipment), None) => write!(f, "{equipment}"),
            (None, Some(distance)) => write!(f, "{distance}"),
            (None, None) => Ok(()),
        }
    }
}

/// A token or segment dropped during a lenient parse.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedToken {
    pub token: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    UnrecognizedSyntax,
    DuplicateTag,
    UnknownPreset(PresetID),
    InvalidNumber,
    InvalidExpression,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnrecognizedSyntax => write!(f, "unrecognized syntax"),
            SkipReason::DuplicateTag => write!(f, "duplicate tag"),
            SkipReason::UnknownPreset(id) => write!(f, "unknown preset {id}"),
            SkipReason::InvalidNumber => write!(f, "invalid number"),
            SkipReason::InvalidExpression => write!(f, "invalid expression"),
        }
    }
}

/// Serializes one calculation list into its `e[...]`/`d[...]` segment.
#[must_use]
pub fn serialize_segment(list: &CalculationList) -> String {
    Segment::from_list(list).to_string()
}

/// Merges a freshly serialized segment into an existing calculation string.
///
/// The segment matching the list's presets type is replaced; a segment of
/// the other tag is carried through byte-for-byte. When nothing in the
/// existing string is recognizable, a clean single-segment string is
/// produced instead.
#[must_use]
pub fn update_calculation_string(existing: Option<&str>, list: &CalculationList) -> String {
    let fresh = serialize_segment(list);

    let Some(existing) = existing else {
        return fresh;
    };

    let mut other: Option<&str> = None;
    for part in split_outside_parens(existing, '/') {
        match parse_segment_parts(part) {
            Some((presets_type, _, _))
                if presets_type != list.presets_type() && other.is_none() =>
            {
                other = Some(part);
            }
            _ => {}
        }
    }

    match (list.presets_type(), other) {
        (PresetsType::Equipment, Some(distance)) => format!("{fresh}/{distance}"),
        (PresetsType::Distance, Some(equipment)) => format!("{equipment}/{fresh}"),
        (_, None) => fresh,
    }
}

/// Result of parsing a calculation string back into a list: the usable list
/// plus diagnostics for everything that was silently skipped.
#[derive(Debug, PartialEq)]
pub struct ParsedCalculation {
    pub list: CalculationList,
    pub skipped: Vec<SkippedToken>,
}

/// Reconstructs the calculation list of one presets type from a persisted
/// string, resolving preset references against the given inventories.
///
/// Never fails: unmatched tokens, dangling preset ids and invalid
/// expressions are skipped (and logged) rather than aborting the parse.
#[must_use]
pub fn parse_calculation_string(
    calc_string: &str,
    working_unit: &str,
    presets_type: PresetsType,
    equipment_weights: &[EquipmentWeight],
    distance_presets: &[DistancePreset],
) -> ParsedCalculation {
    let (parsed, mut skipped) = CalculationString::parse(calc_string);

    let mut list = CalculationList::new(presets_type);

    if let Some(segment) = parsed.segment(presets_type) {
        list.set_total_multiplier(segment.total_multiplier);

        for token in &segment.items {
            let (item, reason) = match token {
                ItemToken::Preset(id, multiplier) => {
                    let item = match presets_type {
                        PresetsType::Equipment => resolve_equipment_weight(equipment_weights, *id)
                            .map(|e| CalculationItem::from_equipment_weight(e, working_unit)),
                        PresetsType::Distance => resolve_distance_preset(distance_presets, *id)
                            .map(|d| CalculationItem::from_distance_preset(d, working_unit)),
                    };
                    (
                        item.map(|i| i.with_multiplier(*multiplier)),
                        SkipReason::UnknownPreset(*id),
                    )
                }
                ItemToken::Number(value, multiplier) => (
                    CalculationItem::from_number(*value, working_unit)
                        .map(|i| i.with_multiplier(*multiplier)),
                    SkipReason::InvalidNumber,
                ),
                ItemToken::Expression(text, multiplier) => (
                    CalculationItem::from_expression(text, working_unit)
                        .map(|i| i.with_multiplier(*multiplier)),
                    SkipReason::InvalidExpression,
                ),
            };
            match item {
                Some(item) => list.push(item),
                None => skipped.push(SkippedToken {
                    token: token.to_string(),
                    reason,
                }),
            }
        }
    }

    for skip in &skipped {
        warn!(
            "skipped {:?} while parsing calculation string: {}",
            skip.token, skip.reason
        );
    }

    ParsedCalculation { list, skipped }
}

/// Splits at `separator` only outside parentheses: `/` is a legal character
/// inside `c(...)` expression tokens and must not break the enclosing
/// segment apart.
fn split_outside_parens(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0u32;
    let mut start = 0;
    for (index, char) in text.char_indices() {
        match char {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if char == separator && depth == 0 => {
                parts.push(&text[start..index]);
                start = index + char.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

fn parse_segment_parts(text: &str) -> Option<(PresetsType, &str, Multiplier)> {
    let (presets_type, rest) = if let Some(rest) = text.strip_prefix('e') {
        (PresetsType::Equipment, rest)
    } else if let Some(rest) = text.strip_prefix('d') {
        (PresetsType::Distance, rest)
    } else {
        return None;
    };

    let rest = rest.strip_prefix('[')?;
    let close = rest.rfind(']')?;
    let body = &rest[..close];
    let multiplier_text = rest[close + 1..].strip_prefix('x')?;
    let total_multiplier = Multiplier::new(parse_decimal(multiplier_text)?).ok()?;

    Some((presets_type, body, total_multiplier))
}

fn parse_item_token(token: &str) -> Option<ItemToken> {
    if let Some(rest) = token.strip_prefix("c(") {
        let close = rest.rfind(')')?;
        let text = &rest[..close];
        let multiplier = parse_multiplier_suffix(&rest[close + 1..])?;
        return Some(ItemToken::Expression(text.to_string(), multiplier));
    }

    if let Some(rest) = token.strip_prefix('p') {
        let (id_text, multiplier) = split_multiplier_suffix(rest)?;
        if id_text.starts_with(|c: char| matches!(c, '1'..='9'))
            && id_text.bytes().all(|b| b.is_ascii_digit())
        {
            let id = id_text.parse::<u32>().ok()?;
            return Some(ItemToken::Preset(PresetID::from(id), multiplier));
        }
        return None;
    }

    if let Some(rest) = token.strip_prefix('n') {
        let (value_text, multiplier) = split_multiplier_suffix(rest)?;
        let value = parse_decimal(value_text)?;
        return Some(ItemToken::Number(value, multiplier));
    }

    None
}

/// Splits an optional `x<multiplier>` suffix off a token tail. An absent or
/// malformed multiplier reads as 1.
fn split_multiplier_suffix(rest: &str) -> Option<(&str, Multiplier)> {
    match rest.split_once('x') {
        Some((head, tail)) => Some((
            head,
            parse_decimal(tail)
                .and_then(|value| Multiplier::new(value).ok())
                .unwrap_or_default(),
        )),
        None => Some((rest, Multiplier::default())),
    }
}

fn parse_multiplier_suffix(suffix: &str) -> Option<Multiplier> {
    if suffix.is_empty() {
        return Some(Multiplier::default());
    }
    let tail = suffix.strip_prefix('x')?;
    Some(
        parse_decimal(tail)
            .and_then(|value| Multiplier::new(value).ok())
            .unwrap_or_default(),
    )
}

/// Strict unsigned decimal with at most two fractional digits, as required
/// by the persisted grammar.
fn parse_decimal(text: &str) -> Option<f32> {
    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (text, None),
    };
    if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if let Some(frac_part) = frac_part {
        if frac_part.is_empty()
            || frac_part.len() > 2
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }
    }
    text.parse().ok()
}
