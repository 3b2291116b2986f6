use std::collections::HashMap;

use crate::errors::SchedulerError;
use crate::network::directions::Direction;

/// Handle to a lane registered in a [`RoadNetwork`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LaneId(pub usize);

/// Handle to a movement registered in a [`RoadNetwork`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MovementId(pub usize);

/// An approach lane and its queued-vehicle counter.
#[derive(Debug, Clone)]
pub struct LaneRecord {
    pub direction: Direction,
    pub number: u32,
    /// Cars currently waiting on this lane. Never negative by construction.
    pub queued_cars: u32,
    /// Movements leaving this lane, in registration order.
    pub outgoing: Vec<MovementId>,
}

/// A directed lane-to-lane flow through the intersection.
#[derive(Debug, Clone, Copy)]
pub struct MovementRecord {
    pub from: LaneId,
    pub to: LaneId,
}

/// Parses `"<DIR><digits>"` lane text into its identity fields without
/// touching any registry.
pub fn parse_lane_text(text: &str) -> Result<(Direction, u32), SchedulerError> {
    let mut chars = text.chars();
    let head = chars
        .next()
        .ok_or_else(|| SchedulerError::Parse(text.to_string()))?;
    let digits = chars.as_str();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SchedulerError::Parse(text.to_string()));
    }
    let direction = Direction::parse(&text[..head.len_utf8()])
        .map_err(|_| SchedulerError::Parse(text.to_string()))?;
    let number = digits
        .parse::<u32>()
        .map_err(|_| SchedulerError::Parse(text.to_string()))?;
    Ok((direction, number))
}

/// Splits `"<Lane> -> <Lane>"` movement text into its two lane identities.
pub fn parse_movement_text(
    text: &str,
) -> Result<((Direction, u32), (Direction, u32)), SchedulerError> {
    let (from, to) = text
        .split_once(" -> ")
        .ok_or_else(|| SchedulerError::Parse(text.to_string()))?;
    let from = parse_lane_text(from).map_err(|_| SchedulerError::Parse(text.to_string()))?;
    let to = parse_lane_text(to).map_err(|_| SchedulerError::Parse(text.to_string()))?;
    Ok((from, to))
}

/// Arena registry for the lanes and movements of one intersection.
///
/// Identities are interned per network: the same (direction, number) pair
/// always resolves to the same [`LaneId`], and the same (from, to) pair to
/// the same [`MovementId`]. Two networks never share handles, so tests can
/// build isolated universes. Registration order is preserved; the phase
/// partitioner iterates movements in that order, which is what makes the
/// partition deterministic.
///
/// There is no removal operation. Lanes and movements live for the life of
/// the network.
#[derive(Debug, Default)]
pub struct RoadNetwork {
    lanes: Vec<LaneRecord>,
    movements: Vec<MovementRecord>,
    lane_index: HashMap<(Direction, u32), LaneId>,
    movement_index: HashMap<(LaneId, LaneId), MovementId>,
}

impl RoadNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a lane, or returns the existing handle for the same
    /// identity. Idempotent.
    pub fn register_lane(&mut self, direction: Direction, number: u32) -> LaneId {
        if let Some(&id) = self.lane_index.get(&(direction, number)) {
            return id;
        }
        let id = LaneId(self.lanes.len());
        self.lanes.push(LaneRecord {
            direction,
            number,
            queued_cars: 0,
            outgoing: Vec::new(),
        });
        self.lane_index.insert((direction, number), id);
        id
    }

    /// Registers a movement, or returns the existing handle for the same
    /// (from, to) pair. A newly created movement is recorded as an outgoing
    /// connection of its origin lane.
    pub fn register_movement(&mut self, from: LaneId, to: LaneId) -> MovementId {
        if let Some(&id) = self.movement_index.get(&(from, to)) {
            return id;
        }
        let id = MovementId(self.movements.len());
        self.movements.push(MovementRecord { from, to });
        self.movement_index.insert((from, to), id);
        self.lanes[from.0].outgoing.push(id);
        id
    }

    /// Resolves lane text, creating the lane on first reference.
    pub fn parse_lane(&mut self, text: &str) -> Result<LaneId, SchedulerError> {
        let (direction, number) = parse_lane_text(text)?;
        Ok(self.register_lane(direction, number))
    }

    /// Resolves movement text, creating both lanes and the movement on first
    /// reference.
    pub fn parse_movement(&mut self, text: &str) -> Result<MovementId, SchedulerError> {
        let (from_key, to_key) = parse_movement_text(text)?;
        let from = self.register_lane(from_key.0, from_key.1);
        let to = self.register_lane(to_key.0, to_key.1);
        Ok(self.register_movement(from, to))
    }

    /// Looks a lane up by text without creating it. Any text that does not
    /// name a registered lane, parseable or not, is an identity miss.
    pub fn find_lane(&self, text: &str) -> Result<LaneId, SchedulerError> {
        parse_lane_text(text)
            .ok()
            .and_then(|key| self.lane_index.get(&key).copied())
            .ok_or_else(|| SchedulerError::IdentityNotFound(text.to_string()))
    }

    /// Looks a movement up by text without creating it.
    pub fn find_movement(&self, text: &str) -> Result<MovementId, SchedulerError> {
        let miss = || SchedulerError::IdentityNotFound(text.to_string());
        let (from_key, to_key) = parse_movement_text(text).map_err(|_| miss())?;
        let from = self.lane_index.get(&from_key).ok_or_else(miss)?;
        let to = self.lane_index.get(&to_key).ok_or_else(miss)?;
        self.movement_index
            .get(&(*from, *to))
            .copied()
            .ok_or_else(miss)
    }

    pub fn lane(&self, id: LaneId) -> &LaneRecord {
        &self.lanes[id.0]
    }

    pub fn movement(&self, id: MovementId) -> &MovementRecord {
        &self.movements[id.0]
    }

    pub fn contains_lane(&self, id: LaneId) -> bool {
        id.0 < self.lanes.len()
    }

    pub fn contains_movement(&self, id: MovementId) -> bool {
        id.0 < self.movements.len()
    }

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    pub fn movement_count(&self) -> usize {
        self.movements.len()
    }

    /// Canonical lane label, e.g. `"N1"`.
    pub fn lane_label(&self, id: LaneId) -> String {
        let lane = self.lane(id);
        format!("{}{}", lane.direction, lane.number)
    }

    /// Canonical movement label, e.g. `"N1 -> S2"`.
    pub fn movement_label(&self, id: MovementId) -> String {
        let movement = self.movement(id);
        format!(
            "{} -> {}",
            self.lane_label(movement.from),
            self.lane_label(movement.to)
        )
    }

    pub fn queued_cars(&self, id: LaneId) -> u32 {
        self.lane(id).queued_cars
    }

    /// Queues one car on the lane. Only the engine calls this.
    pub(crate) fn add_car(&mut self, id: LaneId) {
        self.lanes[id.0].queued_cars += 1;
    }

    /// Removes up to `count` cars from the lane, clamping at an empty queue.
    pub(crate) fn remove_cars(&mut self, id: LaneId, count: u32) {
        let lane = &mut self.lanes[id.0];
        lane.queued_cars = lane.queued_cars.saturating_sub(count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lane_text_round_trips_through_the_registry() {
        let mut network = RoadNetwork::new();
        let id = network.parse_lane("N12").unwrap();
        assert_eq!(network.lane(id).direction, Direction::North);
        assert_eq!(network.lane(id).number, 12);
        assert_eq!(network.lane_label(id), "N12");
    }

    #[test]
    fn lane_interning_is_idempotent() {
        let mut network = RoadNetwork::new();
        let a = network.register_lane(Direction::East, 3);
        let b = network.parse_lane("E3").unwrap();
        let c = network.parse_lane("e3").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(network.lane_count(), 1);
    }

    #[test]
    fn movement_interning_is_idempotent_and_directed() {
        let mut network = RoadNetwork::new();
        let forward = network.parse_movement("N1 -> S2").unwrap();
        let again = network.parse_movement("N1 -> S2").unwrap();
        let reverse = network.parse_movement("S2 -> N1").unwrap();
        assert_eq!(forward, again);
        assert_ne!(forward, reverse);
        assert_eq!(network.movement_count(), 2);
        assert_eq!(network.lane_count(), 2);
    }

    #[test]
    fn movements_are_recorded_as_outgoing_connections() {
        let mut network = RoadNetwork::new();
        let first = network.parse_movement("N1 -> S2").unwrap();
        let second = network.parse_movement("N1 -> W4").unwrap();
        let origin = network.movement(first).from;
        assert_eq!(network.lane(origin).outgoing, vec![first, second]);
    }

    #[test]
    fn malformed_lane_text_names_the_offending_literal() {
        let mut network = RoadNetwork::new();
        for bad in ["", "N", "7", "Z9", "N-1", "N1x"] {
            assert_eq!(
                network.parse_lane(bad),
                Err(SchedulerError::Parse(bad.to_string())),
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn malformed_movement_text_names_the_offending_literal() {
        let mut network = RoadNetwork::new();
        for bad in ["N1 S2", "N1 ->", "N1->S2", "N1 -> Q2"] {
            assert_eq!(
                network.parse_movement(bad),
                Err(SchedulerError::Parse(bad.to_string())),
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn find_lane_never_creates() {
        let mut network = RoadNetwork::new();
        network.parse_lane("N1").unwrap();
        assert!(network.find_lane("N1").is_ok());
        assert_eq!(
            network.find_lane("Z9"),
            Err(SchedulerError::IdentityNotFound("Z9".to_string()))
        );
        assert_eq!(
            network.find_lane("S2"),
            Err(SchedulerError::IdentityNotFound("S2".to_string()))
        );
        assert_eq!(network.lane_count(), 1);
    }

    #[test]
    fn find_movement_requires_the_exact_directed_pair() {
        let mut network = RoadNetwork::new();
        network.parse_movement("N1 -> S2").unwrap();
        assert!(network.find_movement("N1 -> S2").is_ok());
        assert_eq!(
            network.find_movement("S2 -> N1"),
            Err(SchedulerError::IdentityNotFound("S2 -> N1".to_string()))
        );
    }

    #[test]
    fn queue_counter_clamps_at_zero() {
        let mut network = RoadNetwork::new();
        let lane = network.parse_lane("W4").unwrap();
        network.add_car(lane);
        network.add_car(lane);
        assert_eq!(network.queued_cars(lane), 2);
        network.remove_cars(lane, 5);
        assert_eq!(network.queued_cars(lane), 0);
    }
}
