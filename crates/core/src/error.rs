use thiserror::Error;

use crate::config::ConfigError;
use crate::types::Category;

/// Fatal generation failures. A run that returns one of these publishes no map.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum MapGenError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("no nodes found on floor {floor}")]
    NoOccupiedRow { floor: usize },
    #[error("all columns on floor {floor} are filled but it still needs {missing} node(s)")]
    NoFreeColumn { floor: usize, missing: usize },
    #[error("category {category} has no weighted variants to choose from")]
    EmptyCategory { category: Category },
    #[error("chapter {chapter} is out of range, the seed set holds {chapter_count} chapter(s)")]
    ChapterOutOfRange { chapter: usize, chapter_count: usize },
    #[error(
        "map stayed too sparse after {attempts} attempt(s): \
         {connections} connection(s), needs more than {threshold}"
    )]
    AttemptsExhausted { attempts: usize, connections: usize, threshold: f32 },
}
