//! Bracket structure: elimination rounds, round-robin groups and playoffs.

use serde::{Deserialize, Serialize};

use super::{
    BracketKind, EntrantId, Format, GroupId, Match, MatchCoord, MatchId, PlayoffMode,
    RoundRobinSettings,
};

/// Matches of one round, in bracket order.
pub type Round = Vec<Match>;

/// Output of the elimination builder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EliminationBracket {
    pub winners: Vec<Round>,
    pub losers: Vec<Round>,
    pub finals: Option<Match>,
}

impl EliminationBracket {
    pub fn is_empty(&self) -> bool {
        self.winners.is_empty() && self.losers.is_empty() && self.finals.is_none()
    }

    /// The match deciding the whole bracket.
    pub fn deciding_match(&self) -> Option<&Match> {
        match &self.finals {
            Some(finals) => Some(finals),
            None => self.winners.last().and_then(|round| round.first()),
        }
    }
}

/// A round-robin group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub player_ids: Vec<EntrantId>,
    pub matches: Vec<Match>,
}

impl Group {
    pub fn is_complete(&self) -> bool {
        self.matches.iter().all(Match::is_complete)
    }
}

/// The playoff bracket promoted out of a group stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayoffState {
    pub mode: PlayoffMode,

    /// Advancing entrants in playoff seed order (index 0 = seed 1)
    #[serde(default)]
    pub seeded_ids: Vec<EntrantId>,
}

/// A full tournament bracket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub format: Format,

    /// Entrants in seed order (index 0 = seed 1)
    pub seed_order: Vec<EntrantId>,

    #[serde(default)]
    pub winners: Vec<Round>,

    #[serde(default)]
    pub losers: Vec<Round>,

    #[serde(default)]
    pub finals: Option<Match>,

    #[serde(default)]
    pub groups: Vec<Group>,

    #[serde(default)]
    pub round_robin: Option<RoundRobinSettings>,

    #[serde(default)]
    pub playoffs: Option<PlayoffState>,
}

impl Bracket {
    /// An empty bracket for the given format.
    pub fn empty(format: Format) -> Self {
        Self {
            format,
            seed_order: Vec::new(),
            winners: Vec::new(),
            losers: Vec::new(),
            finals: None,
            groups: Vec::new(),
            round_robin: None,
            playoffs: None,
        }
    }

    /// Replace the elimination part of the bracket.
    pub fn set_elimination(&mut self, elimination: EliminationBracket) {
        self.winners = elimination.winners;
        self.losers = elimination.losers;
        self.finals = elimination.finals;
    }

    /// Copy of the elimination part of the bracket.
    pub fn elimination(&self) -> EliminationBracket {
        EliminationBracket {
            winners: self.winners.clone(),
            losers: self.losers.clone(),
            finals: self.finals.clone(),
        }
    }

    pub fn is_round_robin(&self) -> bool {
        self.format == Format::RoundRobin
    }

    /// Find a match by coordinate.
    pub fn match_at(&self, coord: MatchCoord) -> Option<&Match> {
        match coord.bracket {
            BracketKind::Winners => self.winners.get(coord.round)?.get(coord.index),
            BracketKind::Losers => self.losers.get(coord.round)?.get(coord.index),
            BracketKind::Finals => self.finals.as_ref().filter(|_| coord.round == 0 && coord.index == 0),
            BracketKind::Group => self.groups.get(coord.round)?.matches.get(coord.index),
        }
    }

    /// Find a match by coordinate for mutation.
    pub fn match_at_mut(&mut self, coord: MatchCoord) -> Option<&mut Match> {
        match coord.bracket {
            BracketKind::Winners => self.winners.get_mut(coord.round)?.get_mut(coord.index),
            BracketKind::Losers => self.losers.get_mut(coord.round)?.get_mut(coord.index),
            BracketKind::Finals => {
                if coord.round == 0 && coord.index == 0 {
                    self.finals.as_mut()
                } else {
                    None
                }
            }
            BracketKind::Group => self.groups.get_mut(coord.round)?.matches.get_mut(coord.index),
        }
    }

    /// Find a match by id.
    pub fn match_by_id(&self, id: &MatchId) -> Option<&Match> {
        let coord = MatchCoord::parse(id.as_str())?;
        self.match_at(coord).filter(|m| &m.id == id)
    }

    /// Find a match by id for mutation.
    pub fn match_by_id_mut(&mut self, id: &MatchId) -> Option<&mut Match> {
        let coord = MatchCoord::parse(id.as_str())?;
        self.match_at_mut(coord).filter(|m| &m.id == id)
    }

    /// Every match: groups first, then winners, losers and finals.
    pub fn all_matches(&self) -> impl Iterator<Item = &Match> {
        self.groups
            .iter()
            .flat_map(|g| g.matches.iter())
            .chain(self.winners.iter().flatten())
            .chain(self.losers.iter().flatten())
            .chain(self.finals.iter())
    }

    /// True once any match has a recorded result.
    pub fn has_results(&self) -> bool {
        self.all_matches().any(Match::has_result)
    }

    /// True when the group stage exists and every group match is complete.
    pub fn group_stage_complete(&self) -> bool {
        !self.groups.is_empty() && self.groups.iter().all(Group::is_complete)
    }

    /// Entrant ids in the seed order used by elimination matches.
    pub fn elimination_seed_order(&self) -> &[EntrantId] {
        match &self.playoffs {
            Some(playoffs) if self.is_round_robin() => &playoffs.seeded_ids,
            _ => &self.seed_order,
        }
    }
}
