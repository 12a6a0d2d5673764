use thiserror::Error;

use crate::Color;

/// Reason why an entry couldn't be taken from a `PriorityQueue`.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum QueueError {
	/// `pop` was called with nothing queued.
	#[error("priority queue is empty")]
	Empty,
}

/// Reason why colors couldn't be merged into, or looked up in, a palette.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MergeError {
	/// A cluster held no occurrences at all, so it has no average.
	#[error("cluster has no occupants to average")]
	ZeroOccupancy,
	/// A color was never observed while building the tree, or has not been
	/// merged into any cluster yet.
	#[error("color {0:?} has no replacement")]
	UnknownColor(Color),
	/// A member of the cluster already has a replacement from this merge.
	#[error("color {0:?} is already merged into a cluster")]
	AlreadyMerged(Color),
}

/// Reason why a list of palette sizes was rejected.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SizeError {
	/// No sizes were given.
	#[error("no palette sizes given")]
	Empty,
	/// An entry could not be read as an integer.
	#[error("palette size `{0}` is not an integer")]
	NotAnInteger(String),
	/// An entry was zero or negative.
	#[error("palette size `{0}` is not positive")]
	NonPositive(String),
}

/// Reason why an image couldn't be reduced.
#[derive(Debug, Error)]
pub enum ReduceError {
	/// The image has no pixels along at least one axis.
	#[error("image has zero width or height")]
	ZeroDimensions,
	#[error(transparent)]
	Size(#[from] SizeError),
	#[error(transparent)]
	Merge(#[from] MergeError),
	/// Decoding, encoding or file access failed.
	#[error(transparent)]
	Image(#[from] image::ImageError),
}
