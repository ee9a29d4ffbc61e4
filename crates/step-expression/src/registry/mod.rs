//! The conversion registry shared by step expressions.
//!
//! [`TypeRegistry`] stores three kinds of definitions: parameter types used
//! when compiling patterns, structural converters keyed by Rust type, and
//! named [`DataTableType`]s resolved by string at conversion time. All
//! lookups take a read lock, so a registry wrapped in an `Arc` can serve many
//! threads once setup has finished registering types.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap as StdHashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use hashbrown::HashMap;
use step_expression_patterns::{
    BoxError, Expression, ExpressionConfig, ParameterType, ParameterTypeRegistry, PatternError,
    Value,
};

use crate::config;
use crate::convert::{ConversionError, StructuralType, TableConverter};
use crate::datatable::{DataTable, DataTableRow, Rows};

#[cfg(feature = "diagnostics")]
mod diagnostics;
mod structural;
mod table_type;

pub use table_type::DataTableType;

type StructuralFn = dyn Fn(&DataTable) -> Result<Value, ConversionError> + Send + Sync;

#[derive(Clone)]
struct StructuralConverter {
    name: &'static str,
    convert: Arc<StructuralFn>,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Lookup service for parameter types, structural converters and named table
/// types.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use step_expression::{DataTableType, TypeRegistry};
///
/// let registry = Arc::new(TypeRegistry::new());
/// registry.define_data_table_type(DataTableType::new("count", |rows: Vec<Vec<String>>| {
///     Ok::<_, std::convert::Infallible>(rows.len())
/// }));
/// assert!(registry.lookup_table_type_by_name("count").is_some());
/// assert!(registry.lookup_table_type_by_name("missing").is_none());
/// ```
pub struct TypeRegistry {
    parameter_types: RwLock<ParameterTypeRegistry>,
    structural: RwLock<HashMap<TypeId, StructuralConverter>>,
    table_types: RwLock<HashMap<String, DataTableType>>,
    config: Option<ExpressionConfig>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// A registry with the built-in parameter types and structural
    /// conversions, following the process-wide [`config`] for compilation.
    ///
    /// Built-in structural targets are [`DataTable`], `Vec<Vec<String>>`,
    /// `Vec<String>` (cells row by row), `String` (exactly one cell),
    /// `Vec<HashMap<String, String>>` (one map per row keyed by the header)
    /// and `HashMap<String, String>` (two columns of key and value).
    #[must_use]
    pub fn new() -> Self {
        let registry = Self {
            parameter_types: RwLock::new(ParameterTypeRegistry::new()),
            structural: RwLock::new(HashMap::new()),
            table_types: RwLock::new(HashMap::new()),
            config: None,
        };
        registry.insert_structural(structural::table);
        registry.insert_structural(structural::cells);
        registry.insert_structural(structural::flattened);
        registry.insert_structural(structural::single_cell);
        registry.insert_structural(structural::header_maps);
        registry.insert_structural(structural::key_value_map);
        registry
    }

    /// A registry that compiles with `config` instead of the process-wide
    /// setting.
    #[must_use]
    pub fn with_config(config: ExpressionConfig) -> Self {
        Self {
            config: Some(config),
            ..Self::new()
        }
    }

    /// The compiler configuration in effect for this registry.
    #[must_use]
    pub fn expression_config(&self) -> ExpressionConfig {
        self.config.unwrap_or_else(config::expression_config)
    }

    /// Compile `pattern` against the registered parameter types.
    ///
    /// # Errors
    /// Returns [`PatternError`] when the pattern is malformed.
    pub fn compile_expression(&self, pattern: &str) -> Result<Expression, PatternError> {
        let config = self.expression_config();
        Expression::compile(pattern, &read(&self.parameter_types), config)
    }

    /// Register a parameter type for patterns compiled from now on.
    pub fn define_parameter_type(&self, parameter_type: ParameterType) {
        write(&self.parameter_types).define(parameter_type);
    }

    /// Names of the registered parameter types, sorted.
    #[must_use]
    pub fn parameter_type_names(&self) -> Vec<String> {
        read(&self.parameter_types)
            .names()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    /// Register a named table type, returning the definition it replaced.
    pub fn define_data_table_type(&self, table_type: DataTableType) -> Option<DataTableType> {
        let name = table_type.name().to_owned();
        let replaced = write(&self.table_types).insert(name, table_type);
        if let Some(previous) = &replaced {
            log::warn!(
                "data table type `{}` was redefined; conversions now use the new definition",
                previous.name()
            );
        }
        replaced
    }

    /// Find the named table type currently registered under `name`.
    #[must_use]
    pub fn lookup_table_type_by_name(&self, name: &str) -> Option<DataTableType> {
        read(&self.table_types).get(name).cloned()
    }

    /// Names of the registered table types, sorted.
    #[must_use]
    pub fn table_type_names(&self) -> Vec<String> {
        let mut names: Vec<String> = read(&self.table_types).keys().cloned().collect();
        names.sort_unstable();
        names
    }

    fn insert_structural<T, F>(&self, convert: F)
    where
        T: Any + Send + Sync,
        F: Fn(&DataTable) -> Result<T, ConversionError> + Send + Sync + 'static,
    {
        let converter = StructuralConverter {
            name: type_name::<T>(),
            convert: Arc::new(move |table: &DataTable| {
                convert(table).map(|value| Box::new(value) as Value)
            }),
        };
        if write(&self.structural)
            .insert(TypeId::of::<T>(), converter)
            .is_some()
        {
            log::warn!(
                "structural conversion to `{}` was redefined",
                type_name::<T>()
            );
        }
    }

    /// Register a structural conversion producing `T`.
    pub fn define_structural<T, E, F>(&self, convert: F)
    where
        T: Any + Send + Sync,
        E: Into<BoxError>,
        F: Fn(&DataTable) -> Result<T, E> + Send + Sync + 'static,
    {
        self.insert_structural(move |table: &DataTable| {
            convert(table).map_err(|err| ConversionError::Transform {
                type_name: type_name::<T>().to_owned(),
                source: err.into(),
            })
        });
    }

    /// Register [`Rows<T>`] as a structural target.
    pub fn define_rows<T>(&self)
    where
        T: DataTableRow + Send + Sync + 'static,
    {
        self.insert_structural(|table: &DataTable| Ok(Rows::<T>::parse(table)?));
    }

    /// Names of the structural targets, sorted.
    #[must_use]
    pub fn structural_type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = read(&self.structural)
            .values()
            .map(|converter| converter.name)
            .collect();
        names.sort_unstable();
        names
    }

    /// Serialize the registered table, structural and parameter type names
    /// as JSON.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    ///
    /// # Examples
    /// ```
    /// use step_expression::TypeRegistry;
    ///
    /// let json = TypeRegistry::new().dump_json().expect("serialize registry");
    /// assert!(json.contains("\"parameter_types\""));
    /// ```
    #[cfg(feature = "diagnostics")]
    pub fn dump_json(&self) -> serde_json::Result<String> {
        diagnostics::dump_registry(self)
    }

    /// This registry as the converter bound into structural tables.
    #[must_use]
    pub fn table_converter(self: &Arc<Self>) -> Arc<dyn TableConverter> {
        Arc::clone(self) as Arc<dyn TableConverter>
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("table_types", &self.table_type_names())
            .field("structural", &self.structural_type_names())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TableConverter for TypeRegistry {
    fn convert(&self, table: &DataTable, ty: StructuralType) -> Result<Value, ConversionError> {
        let converter = read(&self.structural)
            .get(&ty.id())
            .map(|converter| Arc::clone(&converter.convert))
            .ok_or_else(|| ConversionError::NoConverter {
                type_name: ty.name().to_owned(),
            })?;
        converter(table)
    }
}

/// Map type produced by the built-in map conversions.
pub type CellMap = StdHashMap<String, String>;
