use crate::error::QueueError;

/// A max-priority queue backed by an implicit binary heap.
///
/// Priorities cannot be changed once an entry is pushed. Entries of equal
/// priority come out in no particular order.
#[derive(Debug)]
pub struct PriorityQueue<T> {
	heap: Vec<(u64, T)>,
}

impl<T> Default for PriorityQueue<T> {
	fn default() -> Self {
		PriorityQueue { heap: Vec::new() }
	}
}

impl<T> PriorityQueue<T> {
	pub fn new() -> Self {
		Default::default()
	}

	pub fn len(&self) -> usize {
		self.heap.len()
	}

	pub fn is_empty(&self) -> bool {
		self.heap.is_empty()
	}

	pub fn push(&mut self, priority: u64, value: T) {
		self.heap.push((priority, value));
		let mut idx = self.heap.len() - 1;
		while idx > 0 {
			let parent = (idx - 1) / 2;
			if self.heap[idx].0 <= self.heap[parent].0 {
				break;
			}
			self.heap.swap(idx, parent);
			idx = parent;
		}
	}

	/// Removes and returns the entry with the largest priority.
	pub fn pop(&mut self) -> Result<T, QueueError> {
		if self.heap.is_empty() {
			return Err(QueueError::Empty);
		}
		// The last leaf takes the root's place and sinks.
		let (_, top) = self.heap.swap_remove(0);
		let len = self.heap.len();
		let mut idx = 0;
		loop {
			let left = 2 * idx + 1;
			if left >= len {
				break;
			}
			let right = left + 1;
			let larger = if right < len && self.heap[right].0 > self.heap[left].0 {
				right
			} else {
				left
			};
			if self.heap[larger].0 <= self.heap[idx].0 {
				break;
			}
			self.heap.swap(idx, larger);
			idx = larger;
		}
		Ok(top)
	}
}
