use std::{
    any::{self, Any, TypeId},
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

/// Identity of a concrete Rust type, usable as a map key.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: any::type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Index discriminator of a template or query value.
///
/// Rules are stored under the kinds of their templates and queries look
/// them up by the kinds of their values, so two values share a bucket
/// exactly when they have the same `Kind`.
///
/// - `Wildcard` is the kind of an absent template.
/// - `Str`, `Int`, `Float` and `Bool` are compared by value.
/// - `Record(T)` is a type passed by value, compared with `T: PartialEq`.
/// - `Entity(T)` is a type passed by shared reference; only the type is
///   ever compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Wildcard,
    Str,
    Int,
    Float,
    Bool,
    Record(TypeKey),
    Entity(TypeKey),
}

impl Kind {
    /// Kind of an optional template; `None` is the wildcard.
    pub fn of(value: Option<&Value>) -> Kind {
        value.map_or(Kind::Wildcard, Value::kind)
    }

    pub fn record<T: Any>() -> Kind {
        Kind::Record(TypeKey::of::<T>())
    }

    pub fn entity<T: Any>() -> Kind {
        Kind::Entity(TypeKey::of::<T>())
    }

    pub fn is_wildcard(self) -> bool {
        self == Kind::Wildcard
    }

    /// Whether values of this kind take part in template value filtering.
    pub fn compares_by_value(self) -> bool {
        !matches!(self, Kind::Wildcard | Kind::Entity(_))
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Wildcard => f.write_str("*"),
            Kind::Str => f.write_str("str"),
            Kind::Int => f.write_str("int"),
            Kind::Float => f.write_str("float"),
            Kind::Bool => f.write_str("bool"),
            Kind::Record(key) => f.write_str(key.name()),
            Kind::Entity(key) => write!(f, "&{}", key.name()),
        }
    }
}

trait Shared: Any + Send + Sync + fmt::Debug {
    fn as_any(&self) -> &dyn Any;
}

impl<T> Shared for T
where
    T: Any + Send + Sync + fmt::Debug,
{
    fn as_any(&self) -> &dyn Any {
        self
    }
}

trait Comparable: Shared {
    fn eq_dyn(&self, other: &dyn Comparable) -> bool;
    fn is_zero(&self) -> bool;
}

impl<T> Comparable for T
where
    T: Any + Send + Sync + fmt::Debug + PartialEq + Default,
{
    fn eq_dyn(&self, other: &dyn Comparable) -> bool {
        Shared::as_any(other)
            .downcast_ref::<T>()
            .map_or(false, |other| self == other)
    }

    fn is_zero(&self) -> bool {
        *self == T::default()
    }
}

/// A domain type passed by value.
#[derive(Clone)]
pub struct Record {
    key: TypeKey,
    inner: Arc<dyn Comparable>,
}

impl Record {
    pub fn type_key(&self) -> TypeKey {
        self.key
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.inner, f)
    }
}

/// A domain type passed by shared reference.
#[derive(Clone)]
pub struct Entity {
    key: TypeKey,
    inner: Arc<dyn Shared>,
}

impl Entity {
    pub fn type_key(&self) -> TypeKey {
        self.key
    }

    fn addr(&self) -> *const () {
        Arc::as_ptr(&self.inner) as *const ()
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "&{:?}", &*self.inner)
    }
}

/// A type-erased subject, action, resource or template.
#[derive(Debug, Clone)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Record(Record),
    Entity(Entity),
}

impl Value {
    /// Wraps a domain value that is matched by value.
    ///
    /// A template built from `T::default()` matches any `T`.
    pub fn record<T>(value: T) -> Self
    where
        T: Any + Send + Sync + fmt::Debug + PartialEq + Default,
    {
        Value::Record(Record {
            key: TypeKey::of::<T>(),
            inner: Arc::new(value),
        })
    }

    /// Wraps a domain value that is matched by type only.
    ///
    /// The value is moved into a new `Arc`. A value that is already shared
    /// must go through `Value::from(Arc<T>)`: passing the `Arc<T>` here wraps
    /// it again and yields the kind of `Arc<T>`, not of `T`.
    pub fn entity<T>(value: T) -> Self
    where
        T: Any + Send + Sync + fmt::Debug,
    {
        Value::from(Arc::new(value))
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::Str(_) => Kind::Str,
            Value::Int(_) => Kind::Int,
            Value::Float(_) => Kind::Float,
            Value::Bool(_) => Kind::Bool,
            Value::Record(record) => Kind::Record(record.key),
            Value::Entity(entity) => Kind::Entity(entity.key),
        }
    }

    /// Whether this is the zero value of its kind. Entities never are.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Str(s) => s.is_empty(),
            Value::Int(i) => *i == 0,
            Value::Float(x) => *x == 0.0,
            Value::Bool(b) => !*b,
            Value::Record(record) => record.inner.is_zero(),
            Value::Entity(_) => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Borrows the wrapped domain value of a record or entity.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Record(record) => Shared::as_any(&*record.inner).downcast_ref(),
            Value::Entity(entity) => Shared::as_any(&*entity.inner).downcast_ref(),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a.key == b.key && a.inner.eq_dyn(&*b.inner),
            (Value::Entity(a), Value::Entity(b)) => a.addr() == b.addr(),
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T> From<Arc<T>> for Value
where
    T: Any + Send + Sync + fmt::Debug,
{
    fn from(value: Arc<T>) -> Self {
        Value::Entity(Entity {
            key: TypeKey::of::<T>(),
            inner: value,
        })
    }
}
