//! Scene resolver.
//!
//! [`SceneRegistry`] is the explicit mapping table from [`SceneKey`] to
//! factory function. Factories receive the full state and extract their
//! payload by matching on the variant they were registered for.

use std::{collections::HashMap, fmt};

use crate::{NavigationError, Scene, SceneContext, SceneError, SceneKey, StateType};

/// Factory producing a fresh scene for a state.
pub type SceneFactory<S> =
    Box<dyn Fn(&S, &SceneContext<S>) -> Result<Box<dyn Scene<S>>, SceneError> + Send + Sync>;

/// Registry of scene factories keyed by [`SceneKey`].
pub struct SceneRegistry<S: StateType> {
    factories: HashMap<SceneKey, SceneFactory<S>>,
}

impl<S: StateType> Default for SceneRegistry<S> {
    fn default() -> Self {
        Self { factories: HashMap::new() }
    }
}

impl<S: StateType> fmt::Debug for SceneRegistry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.factories.keys().collect();
        keys.sort();
        f.debug_struct("SceneRegistry").field("keys", &keys).finish()
    }
}

impl<S: StateType> SceneRegistry<S> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` for `key`, replacing any previous factory.
    pub fn register<F>(&mut self, key: SceneKey, factory: F) -> &mut Self
    where
        F: Fn(&S, &SceneContext<S>) -> Result<Box<dyn Scene<S>>, SceneError>
            + Send
            + Sync
            + 'static,
    {
        if self.factories.insert(key, Box::new(factory)).is_some() {
            tracing::debug!(%key, "replaced scene factory");
        }
        self
    }

    /// Builder form of [`Self::register`].
    #[must_use]
    pub fn with<F>(mut self, key: SceneKey, factory: F) -> Self
    where
        F: Fn(&S, &SceneContext<S>) -> Result<Box<dyn Scene<S>>, SceneError>
            + Send
            + Sync
            + 'static,
    {
        self.register(key, factory);
        self
    }

    /// Check if a factory is registered for `key`.
    pub fn contains(&self, key: SceneKey) -> bool {
        self.factories.contains_key(&key)
    }

    /// Number of registered factories.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Check if no factory is registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Produce a scene for `state` and bind the state into it.
    ///
    /// Every call builds a new instance.
    ///
    /// # Errors
    ///
    /// - `NavigationError::SceneCreationFailed` if no factory is registered
    ///   for the state's key, the factory fails, or the factory returns a
    ///   scene of another type
    pub fn resolve(
        &self,
        state: &S,
        ctx: &SceneContext<S>,
    ) -> Result<Box<dyn Scene<S>>, NavigationError> {
        let key = state.scene_key();
        let fail = move |reason| NavigationError::SceneCreationFailed { key, reason };

        let factory = self.factories.get(&key).ok_or_else(|| fail(SceneError::Unregistered))?;
        let mut scene = factory(state, ctx).map_err(fail)?;

        let actual = scene.key();
        if actual != key {
            return Err(fail(SceneError::KeyMismatch { actual }));
        }

        scene.bind_state(state);
        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Screen {
        Splash,
        Chat { channel: String },
        Settings,
    }

    const SPLASH: SceneKey = SceneKey::new("Splash");
    const CHAT: SceneKey = SceneKey::new("Chat");
    const SETTINGS: SceneKey = SceneKey::new("Settings");

    impl StateType for Screen {
        fn scene_key(&self) -> SceneKey {
            match self {
                Self::Splash => SPLASH,
                Self::Chat { .. } => CHAT,
                Self::Settings => SETTINGS,
            }
        }
    }

    struct ChatScene {
        bound: Arc<Mutex<Vec<String>>>,
    }

    impl Scene<Screen> for ChatScene {
        fn key(&self) -> SceneKey {
            CHAT
        }

        fn bind_state(&mut self, state: &Screen) {
            if let Screen::Chat { channel } = state {
                self.bound.lock().unwrap().push(channel.clone());
            }
        }
    }

    struct Blank(SceneKey);

    impl Scene<Screen> for Blank {
        fn key(&self) -> SceneKey {
            self.0
        }
    }

    fn registry() -> SceneRegistry<Screen> {
        registry_recording(Arc::default())
    }

    fn registry_recording(bound: Arc<Mutex<Vec<String>>>) -> SceneRegistry<Screen> {
        SceneRegistry::new().with(SPLASH, |_, _| Ok(Box::new(Blank(SPLASH)))).with(
            CHAT,
            move |_, _| Ok(Box::new(ChatScene { bound: Arc::clone(&bound) })),
        )
    }

    #[test]
    fn resolve_binds_payload() {
        let bound = Arc::new(Mutex::new(Vec::new()));
        let registry = registry_recording(Arc::clone(&bound));
        let state = Screen::Chat { channel: "general".into() };

        let scene = registry.resolve(&state, &SceneContext::default());

        assert!(matches!(scene, Ok(ref s) if s.key() == CHAT));
        assert_eq!(*bound.lock().unwrap(), vec!["general".to_string()]);
    }

    #[test]
    fn unregistered_key_fails() {
        let registry = registry();
        let result = registry.resolve(&Screen::Settings, &SceneContext::default());
        assert_eq!(
            result.err(),
            Some(NavigationError::SceneCreationFailed {
                key: SETTINGS,
                reason: SceneError::Unregistered
            })
        );
    }

    #[test]
    fn factory_failure_is_reported() {
        let registry = registry().with(SETTINGS, |_, _| {
            Err(SceneError::Instantiation("missing layout SettingController".into()))
        });
        let result = registry.resolve(&Screen::Settings, &SceneContext::default());
        assert!(matches!(
            result.err(),
            Some(NavigationError::SceneCreationFailed {
                reason: SceneError::Instantiation(_),
                ..
            })
        ));
    }

    #[test]
    fn mismatched_scene_key_is_rejected() {
        let registry = registry().with(SETTINGS, |_, _| Ok(Box::new(Blank(SPLASH))));
        let result = registry.resolve(&Screen::Settings, &SceneContext::default());
        assert_eq!(
            result.err(),
            Some(NavigationError::SceneCreationFailed {
                key: SETTINGS,
                reason: SceneError::KeyMismatch { actual: SPLASH }
            })
        );
    }

    #[test]
    fn every_resolve_builds_a_new_scene() {
        let registry = registry();
        assert_eq!(registry.len(), 2);
        assert!(registry.contains(SPLASH));
        assert!(registry.resolve(&Screen::Splash, &SceneContext::default()).is_ok());
        assert!(registry.resolve(&Screen::Splash, &SceneContext::default()).is_ok());
    }
}
