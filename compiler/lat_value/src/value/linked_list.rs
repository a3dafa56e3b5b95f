//! Singly linked list payload.
//!
//! Nodes own their successors through `Box`. `Clone` and `Drop` walk the
//! chain iteratively so that long lists cannot overflow the stack.

use std::fmt;

use super::Value;

struct Node {
    value: Value,
    next: Option<Box<Node>>,
}

/// Ordered, front-insertable sequence of heterogeneous values.
pub struct LinkedListValue {
    head: Option<Box<Node>>,
    len: usize,
}

impl LinkedListValue {
    pub fn new() -> Self {
        LinkedListValue { head: None, len: 0 }
    }

    /// Build a list holding `values` in order.
    pub fn from_values(values: Vec<Value>) -> Self {
        let mut list = LinkedListValue::new();
        for value in values.into_iter().rev() {
            list.push_front(value);
        }
        list
    }

    /// Insert at the head in O(1).
    pub fn push_front(&mut self, value: Value) {
        let next = self.head.take();
        self.head = Some(Box::new(Node { value, next }));
        self.len += 1;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn first(&self) -> Option<&Value> {
        self.head.as_deref().map(|node| &node.value)
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.iter().nth(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.iter_mut().nth(index)
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.head.as_deref(),
        }
    }

    /// Rewrites node payloads in place; the chain itself is not relinked.
    pub fn iter_mut(&mut self) -> IterMut<'_> {
        IterMut {
            next: self.head.as_deref_mut(),
        }
    }
}

impl Default for LinkedListValue {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LinkedListValue {
    fn clone(&self) -> Self {
        LinkedListValue::from_values(self.iter().cloned().collect())
    }
}

impl Drop for LinkedListValue {
    fn drop(&mut self) {
        let mut cursor = self.head.take();
        while let Some(mut node) = cursor {
            cursor = node.next.take();
        }
    }
}

impl PartialEq for LinkedListValue {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl fmt::Debug for LinkedListValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

pub struct Iter<'a> {
    next: Option<&'a Node>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.map(|node| {
            self.next = node.next.as_deref();
            &node.value
        })
    }
}

pub struct IterMut<'a> {
    next: Option<&'a mut Node>,
}

impl<'a> Iterator for IterMut<'a> {
    type Item = &'a mut Value;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.take().map(|node| {
            self.next = node.next.as_deref_mut();
            &mut node.value
        })
    }
}

impl<'a> IntoIterator for &'a LinkedListValue {
    type Item = &'a Value;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
