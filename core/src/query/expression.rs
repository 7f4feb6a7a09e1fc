//! Boolean expression algebra over field leaves
//!
//! Expressions are built eagerly as plain data and lowered to SQL in one
//! pass. The algebra is total: any list of terms is accepted, with
//! `and([]) ≡ TRUE` and `or([]) ≡ FALSE`, and negation is always rewritten
//! into the tree (operator complements on leaves, De Morgan over and/or)
//! instead of wrapping subtrees in a generic NOT.

use crate::common::QueryError;
use crate::infra::db::dialect::{self, AccessorCast};
use crate::infra::db::entities::{sample_embedding, sample_tag, tag};
use crate::metadata::MetadataValue;
use crate::query::field::{CompareOp, Field, FieldKind, MetadataField};
use sea_orm::sea_query::{
	ColumnRef, Expr, ExprTrait, IntoColumnRef, Query as SeaQuery, SimpleExpr,
};
use sea_orm::{DatabaseBackend, Value};

/// A boolean predicate over one entity's fields.
#[derive(Debug, Clone)]
pub enum Expression {
	Leaf {
		field: Field,
		op: CompareOp,
		value: Value,
	},
	Metadata {
		field: MetadataField,
		op: CompareOp,
		value: MetadataValue,
	},
	MetadataNotNull {
		field: MetadataField,
		negated: bool,
	},
	And(Vec<Expression>),
	Or(Vec<Expression>),
}

impl Expression {
	pub fn and(terms: Vec<Expression>) -> Expression {
		Expression::And(terms)
	}

	pub fn or(terms: Vec<Expression>) -> Expression {
		Expression::Or(terms)
	}

	/// Negate an expression by rewriting it: comparison leaves swap their
	/// operator for its complement, and/or distribute via De Morgan.
	pub fn not(term: Expression) -> Expression {
		match term {
			Expression::Leaf { field, op, value } => Expression::Leaf {
				field,
				op: op.complement(),
				value,
			},
			Expression::Metadata { field, op, value } => Expression::Metadata {
				field,
				op: op.complement(),
				value,
			},
			Expression::MetadataNotNull { field, negated } => Expression::MetadataNotNull {
				field,
				negated: !negated,
			},
			Expression::And(terms) => {
				Expression::Or(terms.into_iter().map(Expression::not).collect())
			}
			Expression::Or(terms) => {
				Expression::And(terms.into_iter().map(Expression::not).collect())
			}
		}
	}

	/// Lower the expression to a backend boolean expression. Purely
	/// syntactic, no database involved.
	pub fn compile(&self, backend: DatabaseBackend) -> Result<SimpleExpr, QueryError> {
		match self {
			Expression::And(terms) => match terms.len() {
				0 => Ok(Expr::value(true)),
				1 => terms[0].compile(backend),
				_ => {
					let mut compiled = terms.iter().map(|t| t.compile(backend));
					let first = compiled.next().expect("len checked above")?;
					compiled.try_fold(first, |acc, term| Ok(acc.and(term?)))
				}
			},
			Expression::Or(terms) => match terms.len() {
				0 => Ok(Expr::value(false)),
				1 => terms[0].compile(backend),
				_ => {
					let mut compiled = terms.iter().map(|t| t.compile(backend));
					let first = compiled.next().expect("len checked above")?;
					compiled.try_fold(first, |acc, term| Ok(acc.or(term?)))
				}
			},
			Expression::Leaf { field, op, value } => compile_leaf(backend, field, *op, value),
			Expression::Metadata { field, op, value } => {
				compile_metadata(backend, field, *op, value)
			}
			Expression::MetadataNotNull { field, negated } => {
				let accessor = dialect::json_is_not_null(
					backend,
					field.data_column().clone(),
					field.path(),
				)?;
				let exists = correlated_exists(field.correlation(), field.owner_key(), accessor);
				Ok(if *negated { exists.not() } else { exists })
			}
		}
	}
}

fn compile_leaf(
	backend: DatabaseBackend,
	field: &Field,
	op: CompareOp,
	value: &Value,
) -> Result<SimpleExpr, QueryError> {
	match field.kind() {
		FieldKind::String | FieldKind::Numeric | FieldKind::Datetime => {
			let column = Expr::col(field.column().clone());
			match op {
				CompareOp::Lt => Ok(column.lt(value.clone())),
				CompareOp::Gt => Ok(column.gt(value.clone())),
				CompareOp::Lte => Ok(column.lte(value.clone())),
				CompareOp::Gte => Ok(column.gte(value.clone())),
				CompareOp::Eq => Ok(column.eq(value.clone())),
				CompareOp::Ne => Ok(column.ne(value.clone())),
				CompareOp::Contains | CompareOp::NotContains => {
					Err(QueryError::UnsupportedOperator {
						field: field.name().to_string(),
						operator: op.as_str(),
					})
				}
			}
		}
		FieldKind::TagSet => match op {
			CompareOp::Contains | CompareOp::NotContains => {
				// Membership is an existence test against the junction
				// table, not a column comparison.
				let sub = SeaQuery::select()
					.expr(Expr::value(1))
					.from(sample_tag::Entity)
					.inner_join(
						tag::Entity,
						Expr::col((tag::Entity, tag::Column::Id))
							.equals((sample_tag::Entity, sample_tag::Column::TagId)),
					)
					.and_where(
						Expr::col((sample_tag::Entity, sample_tag::Column::SampleId))
							.equals(field.owner_key().clone()),
					)
					.and_where(Expr::col((tag::Entity, tag::Column::Name)).eq(value.clone()))
					.to_owned();

				let exists = Expr::exists(sub);
				Ok(if op == CompareOp::NotContains {
					exists.not()
				} else {
					exists
				})
			}
			_ => Err(QueryError::UnsupportedOperator {
				field: field.name().to_string(),
				operator: op.as_str(),
			}),
		},
	}
}

fn compile_metadata(
	backend: DatabaseBackend,
	field: &MetadataField,
	op: CompareOp,
	value: &MetadataValue,
) -> Result<SimpleExpr, QueryError> {
	let accessor = dialect::json_extract(
		backend,
		field.data_column().clone(),
		field.path(),
		AccessorCast::for_kind(value.kind()),
	)?;
	let bound = value.to_sql_value();

	let comparison = match op {
		CompareOp::Lt => accessor.lt(bound),
		CompareOp::Gt => accessor.gt(bound),
		CompareOp::Lte => accessor.lte(bound),
		CompareOp::Gte => accessor.gte(bound),
		CompareOp::Eq => accessor.eq(bound),
		CompareOp::Ne => accessor.ne(bound),
		CompareOp::Contains | CompareOp::NotContains => {
			return Err(QueryError::UnsupportedOperator {
				field: field.path().to_string(),
				operator: op.as_str(),
			})
		}
	};

	Ok(correlated_exists(
		field.correlation(),
		field.owner_key(),
		comparison,
	))
}

/// EXISTS (SELECT 1 FROM side_table WHERE side_table.fk = owner.pk AND …)
fn correlated_exists(
	correlation: &ColumnRef,
	owner_key: &ColumnRef,
	predicate: SimpleExpr,
) -> SimpleExpr {
	let table = match correlation {
		ColumnRef::TableColumn(table, _) => table.clone(),
		_ => unreachable!("correlation columns are always table-qualified"),
	};

	let sub = SeaQuery::select()
		.expr(Expr::value(1))
		.from(table)
		.and_where(Expr::col(correlation.clone()).equals(owner_key.clone()))
		.and_where(predicate)
		.to_owned();

	Expr::exists(sub)
}

/// Cosine distance between a stored embedding column and a literal vector,
/// used for ranking and adjacency ordering.
#[derive(Debug, Clone)]
pub struct DistanceExpression {
	column: ColumnRef,
	vector: Vec<f32>,
}

impl DistanceExpression {
	pub fn new(column: impl IntoColumnRef, vector: Vec<f32>) -> Self {
		Self {
			column: column.into_column_ref(),
			vector,
		}
	}

	/// Distance to the stored sample embedding vector.
	pub fn to_embedding(vector: Vec<f32>) -> Self {
		Self::new(
			(sample_embedding::Entity, sample_embedding::Column::Vector),
			vector,
		)
	}

	pub fn compile(&self, backend: DatabaseBackend) -> Result<SimpleExpr, QueryError> {
		dialect::cosine_distance(
			backend,
			self.column.clone(),
			&sample_embedding::Model::encode_vector(&self.vector),
		)
	}
}
