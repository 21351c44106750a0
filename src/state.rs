use num_traits::Float;
use serde::de::{self, Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeTuple, Serializer};
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, Div, Index, IndexMut, Mul, Neg, Sub};

/// A configuration of the robot: one real value per degree of freedom.
/// Template Parameters:
/// - `F`: The floating-point type.
/// - `N`: The number of degrees of freedom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Configuration<F: Float, const N: usize> {
    values: [F; N],
}

// serde's array impls stop at concrete sizes, so the fixed-length tuple
// encoding is written out by hand for the generic N.
impl<F: Float + Serialize, const N: usize> Serialize for Configuration<F, N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(N)?;
        for value in &self.values {
            tuple.serialize_element(value)?;
        }
        tuple.end()
    }
}

impl<'de, F: Float + Deserialize<'de>, const N: usize> Deserialize<'de> for Configuration<F, N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct JointValues<F, const N: usize>(PhantomData<F>);

        impl<'de, F: Float + Deserialize<'de>, const N: usize> Visitor<'de> for JointValues<F, N> {
            type Value = Configuration<F, N>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                write!(formatter, "a sequence of {N} joint values")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut values = [F::zero(); N];
                for (i, slot) in values.iter_mut().enumerate() {
                    *slot = seq
                        .next_element()?
                        .ok_or_else(|| de::Error::invalid_length(i, &self))?;
                }
                Ok(Configuration { values })
            }
        }

        deserializer.deserialize_tuple(N, JointValues(PhantomData))
    }
}

impl<F: Float, const N: usize> Configuration<F, N> {
    /// Constructs a configuration from an array of joint values.
    pub fn new(values: [F; N]) -> Self {
        Self { values }
    }

    /// Constructs a configuration with every joint value set to zero.
    pub fn zeros() -> Self {
        Self {
            values: [F::zero(); N],
        }
    }

    pub fn values(&self) -> &[F; N] {
        &self.values
    }

    /// The dot product with another configuration.
    pub fn dot(&self, other: &Self) -> F {
        let mut sum = F::zero();
        for i in 0..N {
            sum = sum + self.values[i] * other.values[i];
        }
        sum
    }

    /// The Euclidean norm.
    pub fn norm(&self) -> F {
        self.norm_squared().sqrt()
    }

    /// The squared Euclidean norm.
    pub fn norm_squared(&self) -> F {
        self.dot(self)
    }

    /// The Euclidean distance to another configuration.
    pub fn euclidean_distance(&self, other: &Self) -> F {
        self.euclidean_distance_squared(other).sqrt()
    }

    /// The squared Euclidean distance to another configuration.
    pub fn euclidean_distance_squared(&self, other: &Self) -> F {
        let mut sum = F::zero();
        for i in 0..N {
            let diff = self.values[i] - other.values[i];
            sum = sum + diff * diff;
        }
        sum
    }

    /// Clamps every joint value into `[minimum[i], maximum[i]]` in place.
    pub fn clamp_to(&mut self, minimum: &Self, maximum: &Self) {
        for i in 0..N {
            if self.values[i] < minimum.values[i] {
                self.values[i] = minimum.values[i];
            } else if self.values[i] > maximum.values[i] {
                self.values[i] = maximum.values[i];
            }
        }
    }
}

impl<F: Float, const N: usize> Index<usize> for Configuration<F, N> {
    type Output = F;

    fn index(&self, index: usize) -> &F {
        &self.values[index]
    }
}

impl<F: Float, const N: usize> IndexMut<usize> for Configuration<F, N> {
    fn index_mut(&mut self, index: usize) -> &mut F {
        &mut self.values[index]
    }
}

impl<F: Float, const N: usize> Add for &Configuration<F, N> {
    type Output = Configuration<F, N>;

    fn add(self, other: Self) -> Configuration<F, N> {
        let mut values = self.values;
        for i in 0..N {
            values[i] = values[i] + other.values[i];
        }
        Configuration { values }
    }
}

impl<F: Float, const N: usize> Add for Configuration<F, N> {
    type Output = Configuration<F, N>;

    fn add(self, other: Self) -> Configuration<F, N> {
        &self + &other
    }
}

impl<F: Float, const N: usize> Sub for &Configuration<F, N> {
    type Output = Configuration<F, N>;

    fn sub(self, other: Self) -> Configuration<F, N> {
        let mut values = self.values;
        for i in 0..N {
            values[i] = values[i] - other.values[i];
        }
        Configuration { values }
    }
}

impl<F: Float, const N: usize> Sub for Configuration<F, N> {
    type Output = Configuration<F, N>;

    fn sub(self, other: Self) -> Configuration<F, N> {
        &self - &other
    }
}

impl<F: Float, const N: usize> Mul<F> for &Configuration<F, N> {
    type Output = Configuration<F, N>;

    fn mul(self, scalar: F) -> Configuration<F, N> {
        let mut values = self.values;
        for value in values.iter_mut() {
            *value = *value * scalar;
        }
        Configuration { values }
    }
}

impl<F: Float, const N: usize> Mul<F> for Configuration<F, N> {
    type Output = Configuration<F, N>;

    fn mul(self, scalar: F) -> Configuration<F, N> {
        &self * scalar
    }
}

impl<F: Float, const N: usize> Div<F> for &Configuration<F, N> {
    type Output = Configuration<F, N>;

    fn div(self, scalar: F) -> Configuration<F, N> {
        let mut values = self.values;
        for value in values.iter_mut() {
            *value = *value / scalar;
        }
        Configuration { values }
    }
}

impl<F: Float, const N: usize> Div<F> for Configuration<F, N> {
    type Output = Configuration<F, N>;

    fn div(self, scalar: F) -> Configuration<F, N> {
        &self / scalar
    }
}

impl<F: Float, const N: usize> Neg for &Configuration<F, N> {
    type Output = Configuration<F, N>;

    fn neg(self) -> Configuration<F, N> {
        let mut values = self.values;
        for value in values.iter_mut() {
            *value = -*value;
        }
        Configuration { values }
    }
}
