//=========================================================================
// Scene Manager
//=========================================================================
//
// Manages scene registration, single-active switching, and lifecycle.
//
// Scenes are stored in a HashMap by key and kept alive between
// activations; only their `on_enter`/`on_exit` hooks build and dispose
// per-activation resources.
//
// Switch sequence:
// ```text
//   Switch(next) queued
//        ↓
//   next.on_enter()          ← input detached, outgoing frozen
//        ↓
//   next.poll_ready() ...    ← once per tick until true
//        ↓
//   active.on_exit()         ← outgoing disposes + cancels tasks
//        ↓
//   active = next            ← session reset, input re-attached
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use crate::core::globals::GameContext;
use super::Scene;

//=== Scene Transition ====================================================

/// Scene change request queued by a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SceneTransition<K: SceneKey> {
    /// Makes another scene the active one.
    Switch(K),

    /// No transition occurs.
    #[default]
    Empty,
}

//=== Scene Switch ========================================================

/// What the manager did with transitions this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneSwitch<K: SceneKey> {
    /// Nothing changed.
    None,
    /// A scene was entered and is still loading.
    Loading(K),
    /// The switch completed.
    Activated { from: Option<K>, to: K },
}

//=== Scene Key Trait =====================================================

/// Marker trait for scene identifiers.
///
/// Scene keys uniquely identify scenes in the SceneManager's HashMap.
/// Typically implemented by game-specific enums.
pub trait SceneKey: Clone + Copy + Eq + Hash + Debug + Send + 'static {}

//=== Scene Manager =======================================================

/// Owns every scene and tracks which one is active.
pub struct SceneManager<S: SceneKey, E> {
    scenes: HashMap<S, Box<dyn Scene<S, E>>>,
    active: Option<S>,
    pending: Option<S>,
    initial: Option<S>,
}

impl<S: SceneKey, E> SceneManager<S, E> {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self {
            scenes: HashMap::new(),
            active: None,
            pending: None,
            initial: None,
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers a scene with the manager.
    pub fn register_scene<T>(&mut self, key: S, scene: T)
    where
        T: Scene<S, E> + 'static,
    {
        if self.scenes.insert(key, Box::new(scene)).is_some() {
            warn!(target: "scene", "Scene {:?} was already registered and has been replaced", key);
        }
    }

    /// Registers a scene and marks it as the one `start()` activates.
    pub fn register_default<T>(&mut self, key: S, scene: T)
    where
        T: Scene<S, E> + 'static,
    {
        self.register_scene(key, scene);
        self.initial = Some(key);
    }

    /// Enters the default scene.
    pub fn start(&mut self, context: &mut GameContext<S, E>) -> SceneSwitch<S> {
        match self.initial {
            Some(initial) => self.begin_switch(initial, context),
            None => {
                warn!(target: "scene", "No default scene registered");
                SceneSwitch::None
            }
        }
    }

    //--- Update Loop ------------------------------------------------------

    /// Runs one tick: finishes a pending load, or updates the active
    /// scene and applies whatever transition it queued.
    pub fn update(&mut self, context: &mut GameContext<S, E>) -> SceneSwitch<S> {
        if let Some(pending) = self.pending {
            return self.poll_pending(pending, context);
        }

        if let Some(active) = self.active {
            if let Some(scene) = self.scenes.get_mut(&active) {
                scene.update(context);
            }
        }

        self.process_transitions(context)
    }

    //--- Transition Processing --------------------------------------------

    /// Applies the first valid queued transition; the rest are dropped.
    fn process_transitions(&mut self, context: &mut GameContext<S, E>) -> SceneSwitch<S> {
        let mut switch = SceneSwitch::None;

        for transition in context.scene_transitions.take() {
            let SceneTransition::Switch(target) = transition else {
                continue;
            };

            if !matches!(switch, SceneSwitch::None) {
                debug!(target: "scene", "Dropping extra transition to {:?}", target);
                continue;
            }

            switch = self.begin_switch(target, context);
        }

        switch
    }

    //--- Internal Helpers -------------------------------------------------

    fn begin_switch(&mut self, target: S, context: &mut GameContext<S, E>) -> SceneSwitch<S> {
        if self.active == Some(target) {
            warn!(target: "scene", "Scene {:?} is already active, skipping switch", target);
            return SceneSwitch::None;
        }

        let Some(scene) = self.scenes.get_mut(&target) else {
            warn!(target: "scene", "Attempted to switch to unregistered scene {:?}", target);
            return SceneSwitch::None;
        };

        debug!(target: "scene", "Entering scene {:?}", target);
        scene.on_enter(context);
        self.pending = Some(target);

        self.poll_pending(target, context)
    }

    fn poll_pending(&mut self, target: S, context: &mut GameContext<S, E>) -> SceneSwitch<S> {
        let ready = self
            .scenes
            .get_mut(&target)
            .map(|scene| scene.poll_ready(context))
            .unwrap_or(true);

        if !ready {
            return SceneSwitch::Loading(target);
        }

        let from = self.active.take();
        if let Some(outgoing) = from {
            if let Some(scene) = self.scenes.get_mut(&outgoing) {
                scene.on_exit(context);
            }
        }

        self.pending = None;
        self.active = Some(target);
        context.session.reset();
        context.scene_transitions.clear();

        info!(target: "scene", "Scene switch {:?} -> {:?}", from, target);
        SceneSwitch::Activated { from, to: target }
    }

    //--- Queries ----------------------------------------------------------

    pub fn active(&self) -> Option<S> {
        self.active
    }

    pub fn pending(&self) -> Option<S> {
        self.pending
    }
}

impl<S: SceneKey, E> Default for SceneManager<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

//=== Tests ===============================================================
