use std::borrow::Cow;

use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

// A parenthesization of a sub-chain; leaves index the input sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Plan {
    Leaf(usize),
    Product(Box<Plan>, Box<Plan>),
}

// A planned sub-chain: the scalar multiply-add count it takes to produce,
// the shape it produces, and how to produce it.
#[derive(Debug, Clone)]
struct Item {
    cost: usize,
    rows: usize,
    columns: usize,
    plan: Plan,
}

impl Item {
    fn leaf(index: usize, rows: usize, columns: usize) -> Item {
        Item {
            cost: 0,
            rows,
            columns,
            plan: Plan::Leaf(index),
        }
    }
}

// Multiplying an `a x b` sub-chain by a `b x c` sub-chain costs `a*b*c` on
// top of producing the operands.
fn combine(left: Item, right: Item) -> Item {
    Item {
        cost: left.cost + right.cost + left.rows * left.columns * right.columns,
        rows: left.rows,
        columns: right.columns,
        plan: Plan::Product(Box::new(left.plan), Box::new(right.plan)),
    }
}

// First enumerated candidate wins a cost tie.
fn pick(candidates: Vec<Item>) -> Item {
    let mut candidates = candidates.into_iter();
    let mut best = candidates.next().expect("at least one candidate");
    for candidate in candidates {
        if candidate.cost < best.cost {
            best = candidate;
        }
    }
    best
}

fn best3(items: [Item; 3]) -> Item {
    let [x, y, z] = items;
    pick(vec![
        combine(combine(x.clone(), y.clone()), z.clone()),
        combine(x, combine(y, z)),
    ])
}

fn best4(items: [Item; 4]) -> Item {
    let [w, x, y, z] = items;
    pick(vec![
        combine(w.clone(), best3([x.clone(), y.clone(), z.clone()])),
        combine(best3([w.clone(), x.clone(), y.clone()]), z.clone()),
        combine(combine(w, x), combine(y, z)),
    ])
}

fn best5(items: [Item; 5]) -> Item {
    let [v, w, x, y, z] = items;
    pick(vec![
        combine(
            v.clone(),
            best4([w.clone(), x.clone(), y.clone(), z.clone()]),
        ),
        combine(
            best4([v.clone(), w.clone(), x.clone(), y.clone()]),
            z.clone(),
        ),
        best3([best3([v.clone(), w.clone(), x.clone()]), y.clone(), z.clone()]),
        best3([v, w, best3([x, y, z])]),
    ])
}

// Chains of up to five matrices enumerate every remaining parenthesization.
// Longer chains split off a prefix of one, two, or three matrices against
// the recursively planned suffix and keep the cheapest of those three
// splits. That keeps planning cheap and the plans good, though not provably
// optimal past five.
fn best(mut items: Vec<Item>) -> Item {
    match items.len() {
        0 => unreachable!("chains are validated non-empty"),
        1 => items.pop().expect("one item"),
        2 => {
            let right = items.pop().expect("two items");
            combine(items.pop().expect("two items"), right)
        }
        3 => best3(items.try_into().expect("three items")),
        4 => best4(items.try_into().expect("four items")),
        5 => best5(items.try_into().expect("five items")),
        _ => {
            let one = combine(items[0].clone(), best(items[1..].to_vec()));
            let two = best3([
                items[0].clone(),
                items[1].clone(),
                best(items[2..].to_vec()),
            ]);
            let three = best4([
                items[0].clone(),
                items[1].clone(),
                items[2].clone(),
                best(items[3..].to_vec()),
            ]);
            pick(vec![one, two, three])
        }
    }
}

fn evaluate<'a>(plan: &Plan, matrices: &[&'a Matrix]) -> Result<Cow<'a, Matrix>> {
    match plan {
        Plan::Leaf(index) => Ok(Cow::Borrowed(matrices[*index])),
        Plan::Product(left, right) => {
            let left = evaluate(left, matrices)?;
            let right = evaluate(right, matrices)?;
            Ok(Cow::Owned(left.checked_mul(&*right)?))
        }
    }
}

fn check_adjacent(matrices: &[&Matrix]) -> Result<()> {
    for pair in matrices.windows(2) {
        if pair[0].column_rank() != pair[1].row_rank() {
            return Err(Error::mismatch(
                "chain multiplication",
                pair[0].column_rank(),
                pair[1].row_rank(),
            ));
        }
    }
    Ok(())
}

/// Multiplies a chain of matrices in the cost-minimizing order.
///
/// The result equals naive left-to-right multiplication for every valid
/// chain; only the number of scalar operations differs. Adjacent ranks are
/// validated up front, before any multiplication runs.
pub fn multiply_chain(matrices: &[&Matrix]) -> Result<Matrix> {
    if matrices.is_empty() {
        return Err(Error::construction("cannot multiply an empty chain"));
    }
    check_adjacent(matrices)?;
    if matrices.len() == 1 {
        return Ok(matrices[0].clone());
    }

    let items = matrices
        .iter()
        .enumerate()
        .map(|(i, m)| Item::leaf(i, m.row_rank(), m.column_rank()))
        .collect();
    let planned = best(items);
    Ok(evaluate(&planned.plan, matrices)?.into_owned())
}

/// The scalar multiply-add count of the plan the chain multiplier would
/// pick for matrices with the given boundary ranks (`ranks[i] x ranks[i+1]`
/// for the i-th matrix).
pub fn chain_cost(ranks: &[usize]) -> Result<usize> {
    if ranks.len() < 2 {
        return Err(Error::construction(
            "a chain needs at least two boundary ranks",
        ));
    }
    let items = ranks
        .windows(2)
        .enumerate()
        .map(|(i, pair)| Item::leaf(i, pair[0], pair[1]))
        .collect();
    Ok(best(items).cost)
}
