use std::fmt::{self};

/// Bucket count the table starts with; growth only ever doubles it.
pub const INITIAL_CAPACITY: usize = 10;

/// The table grows once `size / capacity` reaches this ratio.
pub const LOAD_FACTOR_LIMIT: f64 = 2.0;

/// A single variable binding, owned by exactly one bucket chain.
#[derive(Debug)]
struct Symbol {
    name: String,
    value: i64,
    next: Option<Box<Symbol>>,
}

/// Hash map from variable name to integer value, with separate chaining.
///
/// Collisions append at the tail of the bucket's chain, so a chain holds its
/// symbols in insertion order. Every name appears in at most one chain, at
/// most once.
#[derive(Debug)]
pub struct SymbolTable {
    /// bucket-chain heads; each chain is an owned singly-linked list
    buckets: Vec<Option<Box<Symbol>>>,
    /// number of distinct bindings across all chains
    size: usize,
    /// bucket-array length
    capacity: usize,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            buckets: (0..INITIAL_CAPACITY).map(|_| None).collect(),
            size: 0,
            capacity: INITIAL_CAPACITY,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bind `name` to `value`, overwriting any existing binding in place.
    ///
    /// A fresh symbol goes at the tail of its bucket's chain. After an
    /// insertion that pushes the load factor to `LOAD_FACTOR_LIMIT` or
    /// beyond, the bucket array doubles and every binding is rehashed.
    pub fn put(&mut self, name: &str, value: i64) {
        let index = self.bucket_index(name);

        let mut slot = &mut self.buckets[index];
        loop {
            match slot {
                Some(sym) if sym.name == name => {
                    // reassignment mutates in place, size unchanged
                    sym.value = value;
                    return;
                },
                Some(sym) => slot = &mut sym.next,
                None => {
                    *slot = Some(Box::new(Symbol { name: name.to_string(), value, next: None }));
                    break;
                },
            }
        }
        self.size += 1;

        // real-valued division: integer division would defer growth far
        // past the threshold
        if self.size as f64 / self.capacity as f64 >= LOAD_FACTOR_LIMIT {
            self.rehash(self.capacity * 2);
        }
    }

    /// Look up `name`, returning an independent copy of its value.
    pub fn get(&self, name: &str) -> Option<i64> {
        let index = self.bucket_index(name);

        let mut walker = self.buckets[index].as_deref();
        while let Some(sym) = walker {
            if sym.name == name {
                return Some(sym.value);
            }
            walker = sym.next.as_deref();
        }
        None
    }

    /// Rebuild the bucket array at `new_capacity` and migrate every binding.
    ///
    /// Walks the old chains in bucket order, chain order, re-inserting each
    /// (name, value) through `put`; each old node is dropped only after its
    /// data has been re-inserted into the new array.
    fn rehash(&mut self, new_capacity: usize) {
        let old_buckets =
            std::mem::replace(&mut self.buckets, (0..new_capacity).map(|_| None).collect());
        self.capacity = new_capacity;
        self.size = 0;

        for chain in old_buckets {
            let mut walker = chain;
            while let Some(sym) = walker {
                let sym = *sym;
                self.put(&sym.name, sym.value);
                walker = sym.next;
            }
        }
    }

    /// All bindings, in bucket order then chain order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.buckets
            .iter()
            .flat_map(|chain| ChainIter { walker: chain.as_deref() })
    }

    fn bucket_index(&self, name: &str) -> usize {
        (hash_code(name) % self.capacity as u64) as usize
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SymbolTable {
    // unlink chain nodes one by one so an all-colliding chain cannot
    // overflow in the default recursive Box drop
    fn drop(&mut self) {
        for chain in &mut self.buckets {
            let mut walker = chain.take();
            while let Some(mut sym) = walker {
                walker = sym.next.take();
            }
        }
    }
}

struct ChainIter<'a> {
    walker: Option<&'a Symbol>,
}

impl<'a> Iterator for ChainIter<'a> {
    type Item = (&'a str, i64);

    fn next(&mut self) -> Option<Self::Item> {
        let sym = self.walker?;
        self.walker = sym.next.as_deref();
        Some((&sym.name, sym.value))
    }
}

impl fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "|-----Symbol Table [{} size/{} cap]", self.size, self.capacity)?;
        for (name, value) in self.iter() {
            writeln!(f, "| {name:>10}: {value}")?;
        }
        Ok(())
    }
}

/// Rolling hash over the name's bytes: add the byte, then multiply the
/// running total by 128. The multiply is skipped after the last byte of a
/// multi-character name, and always applied for a one-character name.
pub fn hash_code(name: &str) -> u64 {
    let len = name.len();
    let mut code: u64 = 0;

    for (i, b) in name.bytes().enumerate() {
        code = code.wrapping_add(u64::from(b));
        if len == 1 || i < len - 1 {
            code = code.wrapping_mul(128);
        }
    }

    code
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_then_get() {
        let mut table = SymbolTable::new();
        table.put("x", 5);
        table.put("y", -3);
        assert_eq!(table.get("x"), Some(5));
        assert_eq!(table.get("y"), Some(-3));
        assert_eq!(table.size(), 2);
    }

    #[test]
    fn get_missing_is_none() {
        let table = SymbolTable::new();
        assert_eq!(table.get("x"), None);
    }

    #[test]
    fn reassignment_overwrites_without_growth() {
        let mut table = SymbolTable::new();
        table.put("x", 1);
        table.put("x", 2);
        assert_eq!(table.size(), 1);
        assert_eq!(table.get("x"), Some(2));
    }

    #[test]
    fn single_char_name_multiplies_once() {
        assert_eq!(hash_code("a"), u64::from(b'a') * 128);
    }

    #[test]
    fn multi_char_name_skips_last_multiply() {
        // ((a * 128) + b) with no trailing multiply
        let expected = u64::from(b'a') * 128 + u64::from(b'b');
        assert_eq!(hash_code("ab"), expected);
    }

    #[test]
    fn load_factor_crossing_doubles_capacity_once() {
        let mut table = SymbolTable::new();
        assert_eq!(table.capacity(), INITIAL_CAPACITY);

        // 19 distinct names: 19/10 < 2.0, no growth yet
        for i in 0..19 {
            table.put(&format!("v{i}"), i);
        }
        assert_eq!(table.capacity(), INITIAL_CAPACITY);

        // the 20th crosses the threshold exactly once
        table.put("v19", 19);
        assert_eq!(table.capacity(), INITIAL_CAPACITY * 2);
        assert_eq!(table.size(), 20);
    }

    #[test]
    fn rehash_preserves_every_binding() {
        let mut table = SymbolTable::new();
        for i in 0..25 {
            table.put(&format!("v{i}"), i * 10);
        }
        assert_eq!(table.capacity(), INITIAL_CAPACITY * 2);
        for i in 0..25 {
            assert_eq!(table.get(&format!("v{i}")), Some(i * 10));
        }
    }

    #[test]
    fn iter_yields_each_binding_exactly_once_after_rehash() {
        let mut table = SymbolTable::new();
        for i in 0..21 {
            table.put(&format!("v{i}"), i);
        }
        let mut names: Vec<&str> = table.iter().map(|(name, _)| name).collect();
        assert_eq!(names.len(), 21);
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 21);
    }

    #[test]
    fn last_assigned_value_survives_rehash() {
        let mut table = SymbolTable::new();
        table.put("x", 1);
        for i in 0..20 {
            table.put(&format!("v{i}"), i);
        }
        table.put("x", 42);
        for i in 20..25 {
            table.put(&format!("v{i}"), i);
        }
        assert_eq!(table.get("x"), Some(42));
    }

    #[test]
    fn fully_colliding_table_builds_and_drops() {
        // every name lands in bucket 0 at every capacity the table passes
        // through (10 | 20 | 40 | 80 all divide 80), so the table is one
        // long chain the whole time
        let mut table = SymbolTable::new();
        let mut names = Vec::new();
        let mut i = 0u64;
        while names.len() < 100 {
            let name = format!("v{i}");
            if hash_code(&name) % 80 == 0 {
                names.push(name);
            }
            i += 1;
        }

        for (value, name) in names.iter().enumerate() {
            table.put(name, value as i64);
        }
        assert_eq!(table.size(), 100);
        assert_eq!(table.capacity(), 80);
        for (value, name) in names.iter().enumerate() {
            assert_eq!(table.get(name), Some(value as i64));
        }

        drop(table);
    }

    #[test]
    fn colliding_names_chain_in_insertion_order() {
        let mut table = SymbolTable::new();
        // "a" and "k" are 10 apart, so they share a bucket at capacity 10
        assert_eq!(
            hash_code("a") % INITIAL_CAPACITY as u64,
            hash_code("k") % INITIAL_CAPACITY as u64
        );
        table.put("a", 1);
        table.put("k", 2);
        assert_eq!(table.get("a"), Some(1));
        assert_eq!(table.get("k"), Some(2));
        assert_eq!(table.size(), 2);
    }
}
