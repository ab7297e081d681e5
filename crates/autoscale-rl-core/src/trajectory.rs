//! Trajectory and experience storage

use serde::{Deserialize, Serialize};

use crate::Reward;

/// Single transition in a trajectory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transition<O, A, S> {
    /// Current observation
    pub observation: O,
    /// Action taken
    pub action: A,
    /// Reward received
    pub reward: Reward,
    /// Next observation
    pub next_observation: O,
    /// Whether episode ended
    pub done: bool,
    /// Next internal state (if available)
    pub next_state: Option<S>,
}

/// Complete trajectory of an episode
#[derive(Debug, Clone)]
pub struct Trajectory<O, A, S> {
    /// Sequence of transitions
    pub transitions: Vec<Transition<O, A, S>>,
    /// Total reward
    pub total_reward: f64,
    /// Episode ID
    pub episode_id: String,
}

impl<O, A, S> Trajectory<O, A, S> {
    /// Create a new empty trajectory
    pub fn new(episode_id: String) -> Self {
        Self {
            transitions: Vec::new(),
            total_reward: 0.0,
            episode_id,
        }
    }

    /// Add a transition to the trajectory
    pub fn push(&mut self, transition: Transition<O, A, S>) {
        self.total_reward += transition.reward.0;
        self.transitions.push(transition);
    }

    /// Get the length of the trajectory
    #[must_use]
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// Check if trajectory is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

/// Batch of trajectories
#[derive(Debug, Clone)]
pub struct TrajectoryBatch<O, A, S> {
    /// Collection of trajectories
    pub trajectories: Vec<Trajectory<O, A, S>>,
}

impl<O, A, S> TrajectoryBatch<O, A, S> {
    /// Create a new empty batch
    #[must_use]
    pub fn new() -> Self {
        Self {
            trajectories: Vec::new(),
        }
    }

    /// Add a trajectory to the batch
    pub fn push(&mut self, trajectory: Trajectory<O, A, S>) {
        self.trajectories.push(trajectory);
    }

    /// Get total number of transitions across all trajectories
    #[must_use]
    pub fn total_transitions(&self) -> usize {
        self.trajectories.iter().map(Trajectory::len).sum()
    }

    /// Get average episode reward
    #[must_use]
    pub fn avg_reward(&self) -> f64 {
        if self.trajectories.is_empty() {
            0.0
        } else {
            let total: f64 = self.trajectories.iter().map(|t| t.total_reward).sum();
            total / self.trajectories.len() as f64
        }
    }
}

impl<O, A, S> Default for TrajectoryBatch<O, A, S> {
    fn default() -> Self {
        Self::new()
    }
}
