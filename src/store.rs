use crate::api::{ProfileSource, RawProfile};
use crate::profile::Profile;
use crate::Result;

const LOG_PREFIX: &str = "[profile-store]";

/// Tag of a profile-list request. Only the latest one may land.
pub type Generation = u64;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadStatus {
    /// Nothing requested yet
    #[default]
    Idle,
    Loading,
    Loaded,
    /// The last request failed; the deck is empty
    Failed(String),
}

/// A request issued by [`ProfileStore::begin_load`], to be fulfilled by
/// whoever performs the fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub generation: Generation,
    pub exclude: Option<String>,
}

/// Ordered candidate list, in backend response order.
#[derive(Debug, Default)]
pub struct ProfileStore {
    profiles: Vec<Profile>,
    status: LoadStatus,
    generation: Generation,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Profile> {
        self.profiles.get(index)
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Start a new request. Any request issued before it becomes stale.
    pub fn begin_load(&mut self, exclude: Option<&str>) -> LoadRequest {
        self.generation = self.generation.wrapping_add(1);
        self.status = LoadStatus::Loading;
        log::info!(
            "{} loading profiles (generation {}, exclude {:?})",
            LOG_PREFIX,
            self.generation,
            exclude
        );
        LoadRequest {
            generation: self.generation,
            exclude: exclude.map(str::to_owned),
        }
    }

    /// Land the outcome of a request.
    ///
    /// Returns `false` and leaves the store untouched when `generation`
    /// is stale. A failure empties the store instead of keeping a partial
    /// or outdated list.
    pub fn apply(
        &mut self,
        generation: Generation,
        outcome: Result<Vec<RawProfile>>,
    ) -> bool {
        if generation != self.generation {
            log::warn!(
                "{} dropping stale result of generation {} (current {})",
                LOG_PREFIX,
                generation,
                self.generation
            );
            return false;
        }

        match outcome {
            Ok(records) => {
                self.profiles = records.into_iter().map(Profile::from).collect();
                self.status = LoadStatus::Loaded;
                log::info!(
                    "{} loaded {} profiles",
                    LOG_PREFIX,
                    self.profiles.len()
                );
            }
            Err(e) => {
                log::warn!("{} failed to load profiles: {}", LOG_PREFIX, e);
                self.profiles.clear();
                self.status = LoadStatus::Failed(e.to_string());
            }
        }
        true
    }

    /// Fetch and land in one go, for callers that don't interleave
    /// other work with the request.
    pub async fn load<S>(&mut self, source: &S, exclude: Option<&str>) -> bool
    where
        S: ProfileSource + ?Sized,
    {
        let request = self.begin_load(exclude);
        let outcome = source
            .fetch_profiles(request.exclude.as_deref())
            .await;
        self.apply(request.generation, outcome)
    }
}
