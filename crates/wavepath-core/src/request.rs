//! Path requests and the batch elements that carry their results.

use crate::geom::Point;

/// A source/destination pair.
///
/// Both endpoints are expected to be in-bounds free cells; backends do not
/// validate this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathRequest {
    pub source: Point,
    pub destination: Point,
}

impl PathRequest {
    #[inline]
    pub const fn new(source: Point, destination: Point) -> Self {
        Self {
            source,
            destination,
        }
    }
}

/// One element of a request batch.
///
/// `path` is the only field a backend writes: the cells from source to
/// destination inclusive, or `None` when no path was found.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathItem {
    pub request: PathRequest,
    pub path: Option<Vec<Point>>,
}

impl PathItem {
    /// An unresolved item for `request`.
    pub const fn new(request: PathRequest) -> Self {
        Self {
            request,
            path: None,
        }
    }

    /// Number of cells in the result path, or 0 when unresolved.
    pub fn path_len(&self) -> usize {
        self.path.as_ref().map_or(0, Vec::len)
    }
}

impl From<PathRequest> for PathItem {
    fn from(request: PathRequest) -> Self {
        Self::new(request)
    }
}

/// Build an unresolved batch from a list of requests, keeping their order.
pub fn batch_from(requests: impl IntoIterator<Item = PathRequest>) -> Vec<PathItem> {
    requests.into_iter().map(PathItem::new).collect()
}
