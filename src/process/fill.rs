use super::record::CleanRecord;

/// Replace each `None` with the nearest preceding `Some` value.
/// Leading `None`s stay `None`; nothing is filled backwards.
pub fn carry_forward<'a, T, I>(values: I)
where
    T: Clone + 'a,
    I: IntoIterator<Item = &'a mut Option<T>>,
{
    let mut last: Option<T> = None;
    for v in values {
        match v {
            Some(present) => last = Some(present.clone()),
            None => *v = last.clone(),
        }
    }
}

/// Fill missing opening acts from the previous show, in row order.
pub fn carry_forward_opening_act(records: &mut [CleanRecord]) {
    carry_forward(records.iter_mut().map(|r| &mut r.opening_act));
}
