/// Three reals, used for RGB coordinates and running weighted sums.
///
/// Values are treated as immutable; `add_in_place` is the one exception and
/// exists for accumulation loops where allocating a fresh vector per step
/// would be wasteful.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector3 {
	pub x: f64,
	pub y: f64,
	pub z: f64,
}

impl Vector3 {
	pub fn new(x: f64, y: f64, z: f64) -> Self {
		Vector3 { x, y, z }
	}

	pub fn scale(&self, factor: f64) -> Self {
		Vector3::new(self.x * factor, self.y * factor, self.z * factor)
	}

	pub fn add(&self, other: &Vector3) -> Self {
		Vector3::new(self.x + other.x, self.y + other.y, self.z + other.z)
	}

	pub fn add_in_place(&mut self, other: &Vector3) {
		self.x += other.x;
		self.y += other.y;
		self.z += other.z;
	}

	pub fn squared_distance(&self, other: &Vector3) -> f64 {
		let dx = self.x - other.x;
		let dy = self.y - other.y;
		let dz = self.z - other.z;
		dx * dx + dy * dy + dz * dz
	}
}

impl From<crate::Color> for Vector3 {
	fn from(c: crate::Color) -> Self {
		Vector3::new(c.0[0] as f64, c.0[1] as f64, c.0[2] as f64)
	}
}
