mod common;

use lfg_deploy::chain::contracts::LendPool;

#[tokio::test]
async fn test_lend_pool_deposits() {
    let Some(fx) = common::deploy_fixture().await else { return };
    let pool = LendPool::new(fx.address("LendPool"), fx.deployer());
    let deployer = fx.ctx.deployer;

    // Depositing DAI the deployer does not hold must revert.
    let dai = fx.token("DAI");
    let no_dai = pool.deposit(dai.address(), common::ether(10));
    assert!(no_dai.send().await.is_err(), "deposit without balance should revert");

    // Wrap, approve and deposit WETH.
    let amount = common::ether(1);
    let weth = fx.wrap_eth(amount).await;
    let weth_before = weth.balance_of(deployer).call().await.expect("WETH balance");

    weth.approve(pool.address(), amount)
        .send()
        .await
        .expect("send approve")
        .await
        .expect("approve receipt");
    pool.deposit(weth.address(), amount)
        .send()
        .await
        .expect("send deposit")
        .await
        .expect("deposit receipt");

    let user_balance = pool.user_balance(deployer, weth.address()).call().await.expect("userBalance");
    assert_eq!(user_balance, amount);

    let weth_after = weth.balance_of(deployer).call().await.expect("WETH balance");
    assert_eq!(weth_before - weth_after, amount);

    let (total_collateral, _, _, _) = pool.get_liquidity().call().await.expect("getLiquidity");
    assert!(!total_collateral.is_zero());
    println!("✅ LendPool accepted {} wei of WETH", amount);
    fx.restore().await;
}
