use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::game_record::{GameKey, GameRecord};
use crate::reconcile::{over_under_result, spread_result};

const STORE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreFile {
    version: u32,
    games: Vec<GameRecord>,
}

/// Ordered sequence of games, unique by natural key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameStore {
    games: Vec<GameRecord>,
}

impl GameStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_games(games: Vec<GameRecord>) -> Self {
        let mut store = Self::new();
        store.append(games);
        store
    }

    /// Appends games whose key is not already present; the first occurrence wins.
    /// Returns how many were added.
    pub fn append(&mut self, games: impl IntoIterator<Item = GameRecord>) -> usize {
        let mut seen: HashSet<GameKey> = self.games.iter().map(GameRecord::key).collect();
        let before = self.games.len();
        for game in games {
            if seen.insert(game.key()) {
                self.games.push(game);
            }
        }
        self.games.len() - before
    }

    /// Swaps every stored game of `seasons` for `games`, keeping all other
    /// seasons. Lines of a replaced game carry over to the new record with the
    /// same key, with results recomputed from the new score. Games end up
    /// ordered by season, stable within one.
    pub fn replace_seasons(
        &mut self,
        seasons: &HashSet<i32>,
        games: impl IntoIterator<Item = GameRecord>,
    ) -> usize {
        let (replaced, kept): (Vec<GameRecord>, Vec<GameRecord>) = std::mem::take(&mut self.games)
            .into_iter()
            .partition(|game| seasons.contains(&game.season));
        let previous: HashMap<GameKey, GameRecord> = replaced
            .into_iter()
            .map(|game| (game.key(), game))
            .collect();

        self.games = kept;
        let added = self.append(games.into_iter().map(|mut game| {
            if let Some(old) = previous.get(&game.key())
                && !game.has_betting()
            {
                game.spread = old.spread;
                game.over_under = old.over_under;
                game.spread_result = spread_result(game.home_score, game.away_score, old.spread);
                game.ou_result = over_under_result(game.home_score, game.away_score, old.over_under);
            }
            game
        }));
        self.games.sort_by_key(|game| game.season);
        added
    }

    pub fn games(&self) -> &[GameRecord] {
        &self.games
    }

    pub fn games_mut(&mut self) -> &mut [GameRecord] {
        &mut self.games
    }

    pub fn into_games(self) -> Vec<GameRecord> {
        self.games
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read game store {}", path.display()))?;
        let file = serde_json::from_str::<StoreFile>(&raw)
            .with_context(|| format!("invalid game store {}", path.display()))?;
        if file.version != STORE_VERSION {
            return Err(anyhow!(
                "game store {} has version {}, expected {STORE_VERSION}",
                path.display(),
                file.version
            ));
        }
        Ok(Self::from_games(file.games))
    }

    /// Replaces the file at `path` with this store.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create store dir {}", parent.display()))?;
        }
        let file = StoreFile {
            version: STORE_VERSION,
            games: self.games.clone(),
        };
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(&file).context("serialize game store")?;
        fs::write(&tmp, json).context("write game store")?;
        fs::rename(&tmp, path).context("swap game store")?;
        Ok(())
    }
}
