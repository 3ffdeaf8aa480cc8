use log::debug;

use crate::frame::{Comparator, Result, Value, column::Column};

/// Element selection on a single [`Column`].
pub trait ColumnMasks: Sized {
    /// Elements where `element <cmp> value`.
    fn compare_mask(&self, cmp: Comparator, value: &Value) -> Result<Self>;

    fn eq_mask(&self, value: &Value) -> Result<Self> {
        self.compare_mask(Comparator::Eq, value)
    }

    fn ne_mask(&self, value: &Value) -> Result<Self> {
        self.compare_mask(Comparator::Ne, value)
    }

    fn lt_mask(&self, value: &Value) -> Result<Self> {
        self.compare_mask(Comparator::Lt, value)
    }

    fn le_mask(&self, value: &Value) -> Result<Self> {
        self.compare_mask(Comparator::Le, value)
    }

    fn gt_mask(&self, value: &Value) -> Result<Self> {
        self.compare_mask(Comparator::Gt, value)
    }

    fn ge_mask(&self, value: &Value) -> Result<Self> {
        self.compare_mask(Comparator::Ge, value)
    }

    /// Dispatch on a comparator chosen at runtime (legacy entry point).
    fn mask(&self, how: Comparator, value: &Value) -> Result<Self> {
        self.compare_mask(how, value)
    }
}

impl ColumnMasks for Column {
    fn compare_mask(&self, cmp: Comparator, value: &Value) -> Result<Column> {
        let name = self.name().unwrap_or("<unnamed>");
        let mask = self.data().compare_mask(name, cmp, value)?;
        let out = self.filter(&mask)?;
        debug!("{cmp}_mask on column '{name}' kept {}/{}", out.len(), self.len());
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameError;

    fn prices() -> Column {
        Column::new(vec![Some(3.5), None, Some(1.0), Some(3.5)]).with_name("price")
    }

    #[test]
    fn test_series_comparisons() {
        let s = prices();
        assert_eq!(s.eq_mask(&Value::Float(3.5)).unwrap().len(), 2);
        assert_eq!(s.ne_mask(&Value::Float(3.5)).unwrap().len(), 2);
        assert_eq!(s.lt_mask(&Value::Int(2)).unwrap().values(), vec![Value::Float(1.0)]);
        assert_eq!(s.le_mask(&Value::Float(3.5)).unwrap().len(), 3);
        assert_eq!(s.gt_mask(&Value::Float(1.0)).unwrap().len(), 2);
        assert_eq!(s.ge_mask(&Value::Float(1.0)).unwrap().len(), 3);
    }

    #[test]
    fn test_series_mask_keeps_labels() {
        let out = prices().ge_mask(&Value::Float(3.0)).unwrap();
        assert_eq!(out.index(), &[Value::Int(0), Value::Int(3)]);
        assert_eq!(out.name(), Some("price"));
    }

    #[test]
    fn test_series_dispatch_from_tag() {
        let how = "gt".parse::<Comparator>().unwrap();
        assert_eq!(prices().mask(how, &Value::Float(2.0)).unwrap().len(), 2);
        assert!(matches!(
            "xx".parse::<Comparator>(),
            Err(FrameError::InvalidTag(_))
        ));
    }

    #[test]
    fn test_series_rejects_string_operand() {
        let err = prices().eq_mask(&Value::from("3.5")).unwrap_err();
        assert!(matches!(err, FrameError::IncomparableValue { column, .. } if column == "price"));
    }
}
