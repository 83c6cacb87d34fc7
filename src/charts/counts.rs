use arrow::{
    array::{ArrayRef, Float64Array, Int64Array},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use std::{
    collections::{BTreeMap, HashMap},
    hash::Hash,
    sync::Arc,
};

use crate::error::ChartResult;

pub const COUNT: &str = "count";

/// Occurrences per key, most frequent first. Equal counts keep the order in
/// which their keys were first seen.
pub fn value_counts<K, I>(keys: I) -> Vec<(K, i64)>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = K>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut counts: Vec<(K, i64)> = Vec::new();
    for key in keys {
        match index.get(&key) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(key.clone(), counts.len());
                counts.push((key, 1));
            }
        }
    }
    // stable, so first-seen order survives among ties
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Occurrences per key in ascending key order.
pub fn grouped_counts<K, I>(keys: I) -> Vec<(K, i64)>
where
    K: Ord,
    I: IntoIterator<Item = K>,
{
    let mut groups: BTreeMap<K, i64> = BTreeMap::new();
    for key in keys {
        *groups.entry(key).or_insert(0) += 1;
    }
    groups.into_iter().collect()
}

/// Arithmetic mean per key in ascending key order.
pub fn grouped_means<K, I>(pairs: I) -> Vec<(K, f64)>
where
    K: Ord,
    I: IntoIterator<Item = (K, f64)>,
{
    let mut groups: BTreeMap<K, (f64, u64)> = BTreeMap::new();
    for (key, value) in pairs {
        let acc = groups.entry(key).or_insert((0.0, 0));
        acc.0 += value;
        acc.1 += 1;
    }
    groups
        .into_iter()
        .map(|(key, (sum, n))| (key, sum / n as f64))
        .collect()
}

/// Two-column `(key, count)` summary table.
pub fn count_table(key: Field, keys: ArrayRef, counts: Vec<i64>) -> ChartResult<RecordBatch> {
    let schema = Schema::new(vec![
        key,
        Field::new(COUNT, DataType::Int64, false),
    ]);
    let batch = RecordBatch::try_new(
        Arc::new(schema),
        vec![keys, Arc::new(Int64Array::from(counts)) as ArrayRef],
    )?;
    Ok(batch)
}

/// Summary table of key columns followed by one Float64 value column.
pub fn value_table(
    keys: Vec<(Field, ArrayRef)>,
    value: Field,
    values: Vec<f64>,
) -> ChartResult<RecordBatch> {
    let (mut fields, mut columns): (Vec<Field>, Vec<ArrayRef>) = keys.into_iter().unzip();
    fields.push(value);
    columns.push(Arc::new(Float64Array::from(values)));
    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
}
