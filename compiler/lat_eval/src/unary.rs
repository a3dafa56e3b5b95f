//! Unary bitwise-not over every numeric kind.

use lat_stack::ensure_sufficient_stack;
use lat_value::{
    type_error, Element, EvalError, EvalResult, Scalar, SetFloat, TensorBlock, TensorValue, Value,
};

use crate::scalar;

const SYMBOL: &str = "~";

fn flip<T: Element>(items: &mut [T]) {
    for x in items {
        *x = T::from_scalar(scalar::bit_not(x.to_scalar()));
    }
}

fn flip_tensor<T: Element>(tensor: &mut TensorValue<T>) {
    for block in tensor.blocks_mut() {
        match block {
            TensorBlock::Matrix(m) => m.rows_mut().for_each(flip),
            TensorBlock::Tensor(t) => ensure_sufficient_stack(|| flip_tensor(t)),
        }
    }
}

fn flip_children<'a>(children: impl Iterator<Item = &'a mut Value>) -> Result<(), EvalError> {
    for slot in children {
        let child = std::mem::replace(slot, Value::Nil);
        *slot = ensure_sufficient_stack(|| bit_not(child))?;
    }
    Ok(())
}

/// `~value`: flip every bit of every element. Float elements flip their
/// IEEE-754 bit pattern. Containers follow the mutate-or-allocate rule;
/// sets always produce a new set.
pub fn bit_not(value: Value) -> EvalResult {
    match value {
        Value::Zero => Ok(Value::Integer(!0)),
        Value::Short(n) => Ok(Value::Short(!n)),
        Value::Integer(n) => Ok(Value::Integer(!n)),
        Value::Float32(f) => Ok(scalar::bit_not(Scalar::Float32(f)).into_value()),
        Value::Float64(f) => Ok(scalar::bit_not(Scalar::Float64(f)).into_value()),
        Value::IntVector(mut v) => {
            flip(v.make_mut().as_mut_slice());
            Ok(Value::IntVector(v))
        }
        Value::ShortVector(mut v) => {
            flip(v.make_mut().as_mut_slice());
            Ok(Value::ShortVector(v))
        }
        Value::FloatVector(mut v) => {
            flip(v.make_mut().as_mut_slice());
            Ok(Value::FloatVector(v))
        }
        Value::NumberVector(mut v) => {
            flip(v.make_mut().as_mut_slice());
            Ok(Value::NumberVector(v))
        }
        Value::IntSet(s) => Ok(Value::int_set(s.iter().map(|n| !n).collect())),
        Value::NumberSet(s) => Ok(Value::number_set(
            s.iter()
                .map(|f| SetFloat(f64::from_bits(!f.get().to_bits())))
                .collect(),
        )),
        Value::Matrix32(mut m) => {
            m.make_mut().rows_mut().for_each(flip);
            Ok(Value::Matrix32(m))
        }
        Value::Matrix64(mut m) => {
            m.make_mut().rows_mut().for_each(flip);
            Ok(Value::Matrix64(m))
        }
        Value::Tensor32(mut t) => {
            flip_tensor(t.make_mut());
            Ok(Value::Tensor32(t))
        }
        Value::Tensor64(mut t) => {
            flip_tensor(t.make_mut());
            Ok(Value::Tensor64(t))
        }
        Value::List(mut items) => {
            flip_children(items.make_mut().iter_mut())?;
            Ok(Value::List(items))
        }
        Value::LinkedList(mut list) => {
            flip_children(list.make_mut().iter_mut())?;
            Ok(Value::LinkedList(list))
        }
        Value::Nil | Value::Str(_) | Value::StringVector(_) => {
            Err(type_error(SYMBOL, value.type_name()).with_operand(&value))
        }
    }
}
