/// A step taken by the simplifier. Each rule pushes its step when it rewrites an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// `0+a = a`
    AddZero,

    /// `a+(b+c) = a+b+c`
    FlattenSum,

    /// `2a+3a = 5a`
    CombineLikeTerms,

    /// `0*a = 0`
    MultiplyZero,

    /// `1*a = a`
    MultiplyOne,

    /// `a*(b*c) = a*b*c`
    FlattenProduct,

    /// `3/12 = 1/4`
    ReduceFraction,

    /// `a^b*a^c = a^(b+c)`
    CombineLikeFactors,

    /// `a^0 = 1`
    PowerZero,

    /// `a^1 = a`
    PowerOne,

    /// `1^a = 1`
    PowerOfOne,

    /// `0^a = 0`, for positive `a`
    PowerOfZero,

    /// `2^3 = 8`
    EvaluatePower,

    /// `(a^b)^c = a^(b*c)`
    PowerOfPower,

    /// `(a*b)^c = a^c*b^c`
    DistributePower,

    /// `a*(b+c) = a*b+a*c`
    DistributiveProperty,

    /// `a/b + c/d = (a*d + c*b)/(b*d)`
    CombineFractions,

    /// `a*b + a*c = a*(b+c)`
    FactorCommonTerms,
}
