use serde::{Serialize, Deserialize};

use crate::error::{NetError, Result};
use crate::network::layout::LayerLayout;

/// One labelled training case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    pub input: Vec<f64>,
    pub target: Vec<f64>,
}

impl Example {
    pub fn new(input: Vec<f64>, target: Vec<f64>) -> Example {
        Example { input, target }
    }
}

/// The ordered example set. Order is significant: examples are visited in
/// sequence within every sweep.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrainingSet {
    cases: Vec<Example>,
}

impl TrainingSet {
    pub fn new(cases: Vec<Example>) -> TrainingSet {
        TrainingSet { cases }
    }

    /// Builds a set from parallel input and target lists.
    pub fn from_pairs(inputs: Vec<Vec<f64>>, targets: Vec<Vec<f64>>) -> Result<TrainingSet> {
        if inputs.len() != targets.len() {
            return Err(NetError::shape("target list", inputs.len(), targets.len()));
        }
        Ok(TrainingSet {
            cases: inputs.into_iter().zip(targets).map(|(i, t)| Example::new(i, t)).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn cases(&self) -> &[Example] {
        &self.cases
    }

    pub fn get(&self, case: usize) -> Result<&Example> {
        self.cases.get(case).ok_or(NetError::CaseOutOfRange {
            case,
            len: self.cases.len(),
        })
    }

    /// Every input must match layer 0 and every target the output layer.
    pub fn validate(&self, layout: &LayerLayout) -> Result<()> {
        if self.cases.is_empty() {
            return Err(NetError::EmptyTrainingSet);
        }
        for (case, example) in self.cases.iter().enumerate() {
            if example.input.len() != layout.input_width() {
                return Err(NetError::shape(
                    format!("input of case {case}"),
                    layout.input_width(),
                    example.input.len(),
                ));
            }
            if example.target.len() != layout.output_width() {
                return Err(NetError::shape(
                    format!("target of case {case}"),
                    layout.output_width(),
                    example.target.len(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> LayerLayout {
        LayerLayout::new(vec![2, 3, 1]).unwrap()
    }

    #[test]
    fn wrong_input_size() {
        let set = TrainingSet::new(vec![
            Example::new(vec![0.0, 0.0], vec![0.0]),
            Example::new(vec![0.0], vec![1.0]),
        ]);
        match set.validate(&layout()) {
            Err(NetError::ShapeMismatch { what, expected, found }) => {
                assert_eq!(what, "input of case 1");
                assert_eq!((expected, found), (2, 1));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn wrong_output_size() {
        let set = TrainingSet::new(vec![Example::new(vec![0.0, 0.0], vec![0.0, 1.0])]);
        assert!(matches!(set.validate(&layout()), Err(NetError::ShapeMismatch { .. })));
    }

    #[test]
    fn empty_set() {
        assert!(matches!(TrainingSet::default().validate(&layout()), Err(NetError::EmptyTrainingSet)));
    }

    #[test]
    fn pairs_must_line_up() {
        assert!(TrainingSet::from_pairs(vec![vec![1.0]], vec![]).is_err());
        let set = TrainingSet::from_pairs(vec![vec![1.0, 2.0]], vec![vec![3.0]]).unwrap();
        assert_eq!(set.get(0).unwrap().target, vec![3.0]);
        assert!(matches!(set.get(1), Err(NetError::CaseOutOfRange { case: 1, len: 1 })));
    }
}
