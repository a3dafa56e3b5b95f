//! String arithmetic. Only `+` applies: it concatenates.

use lat_ir::ArithOp;
use lat_value::{type_error, EvalResult, Value};

use crate::kernel::Kernel;

/// `left op right` where at least one side is a string or string vector.
pub(crate) fn eval_text_binary(left: Value, right: Value, op: ArithOp) -> EvalResult {
    if !op.applies_to_strings() {
        let culprit = if left.kind().is_textual() { &left } else { &right };
        return Err(type_error(op.as_symbol(), culprit.type_name()).with_operand(culprit));
    }
    match (left, right) {
        (Value::Str(mut s), Value::Str(t)) => {
            s.make_mut().push_str(&t);
            Ok(Value::Str(s))
        }
        (Value::StringVector(mut v), Value::Str(t)) => {
            for item in v.make_mut() {
                item.push_str(&t);
            }
            Ok(Value::StringVector(v))
        }
        (Value::Str(s), Value::StringVector(mut v)) => {
            for item in v.make_mut() {
                item.insert_str(0, &s);
            }
            Ok(Value::StringVector(v))
        }
        (Value::StringVector(mut v), Value::StringVector(w)) => {
            for (item, suffix) in v.make_mut().iter_mut().zip(w.iter()) {
                item.push_str(suffix);
            }
            Ok(Value::StringVector(v))
        }
        (left, right) => Err(Kernel::new(op).mismatch(left.type_name(), right.type_name())),
    }
}
